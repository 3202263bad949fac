//! The 3-D Secure device-fingerprint/challenge state machine.
//!
//! idle → fingerprinting → (authenticated | challenge required) →
//! challenge in progress → finalized. The vendor challenge callback is the
//! sole completion trigger for a challenge, and it may legally arrive
//! without a validation JWT.

use std::sync::Arc;

use api_models::three_ds::{
    AuthenticationStatus, ChallengePayload, FinalizeRequest, JwtCardInfo, JwtRequest,
};
use base64::Engine;
use common_utils::{errors::CustomResult, ext_traits::ByteSliceExt};
use error_stack::report;
use masking::{ExposeInterface, Secret};
use sdk_env::{instrument, logger, tracing};

use crate::{
    client::PaymentHubClient,
    errors::{ErrorCode, SdkError},
    vendors::{ChallengeEvent, ChallengePresenting, FingerprintingSession},
};

/// Where one authentication currently stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThreeDsState {
    /// Nothing started.
    Idle,
    /// JWT obtained, device fingerprinting running.
    Fingerprinting,
    /// Fingerprinting authenticated the device without a challenge.
    Authenticated,
    /// The backend demands an interactive challenge.
    ChallengeRequired,
    /// The challenge UI is on screen.
    ChallengeInProgress,
    /// Authentication finished and, where needed, finalized.
    Finalized,
}

/// Drives one 3DS authentication. Holds the per-flow state; a new
/// authentication means a new service value.
pub struct ThreeDsService {
    client: PaymentHubClient,
    fingerprinter: Arc<dyn FingerprintingSession>,
    challenger: Arc<dyn ChallengePresenting>,
    state: ThreeDsState,
}

impl std::fmt::Debug for ThreeDsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreeDsService")
            .field("state", &self.state)
            .finish()
    }
}

impl ThreeDsService {
    /// Build a service over the API client and the two vendor seams.
    pub fn new(
        client: PaymentHubClient,
        fingerprinter: Arc<dyn FingerprintingSession>,
        challenger: Arc<dyn ChallengePresenting>,
    ) -> Self {
        Self {
            client,
            fingerprinter,
            challenger,
            state: ThreeDsState::Idle,
        }
    }

    /// Current machine state.
    pub fn state(&self) -> ThreeDsState {
        self.state
    }

    /// Run the full ritual: JWT → fingerprinting → optional challenge →
    /// finalize. Success means the authentication is accepted.
    #[instrument(skip_all)]
    pub async fn initiate_flow(
        &mut self,
        account_id: &str,
        card_bin: Option<String>,
    ) -> CustomResult<(), SdkError> {
        let correlation_id = self.client.session().correlation_id().to_string();

        self.state = ThreeDsState::Fingerprinting;
        let jwt_response = self
            .client
            .request_authentication_jwt(&JwtRequest {
                account_id: account_id.to_string(),
                card: card_bin.map(|card_bin| JwtCardInfo { card_bin }),
            })
            .await?;

        let authentication = self
            .fingerprinter
            .run(jwt_response.jwt, jwt_response.device_fingerprinting_id)
            .await
            .map_err(|error| {
                report!(SdkError::new(
                    ErrorCode::ThreeDsSessionFailure,
                    &correlation_id,
                    format!("fingerprinting session failed: {error:?}"),
                ))
            })?;

        match authentication.status {
            AuthenticationStatus::Completed => {
                self.state = ThreeDsState::Authenticated;
                let accepted = authentication
                    .three_d_result
                    .map_or(true, |result| result.is_accepted());
                if accepted {
                    self.state = ThreeDsState::Finalized;
                    Ok(())
                } else {
                    Err(report!(SdkError::new(
                        ErrorCode::ThreeDsFailedValidation,
                        &correlation_id,
                        "authentication completed with a declined result",
                    )))
                }
            }
            AuthenticationStatus::Pending => {
                let Some(challenge_payload) = authentication.sdk_challenge_payload else {
                    return Err(report!(SdkError::new(
                        ErrorCode::ThreeDsChallengePayloadError,
                        &correlation_id,
                        "authentication is pending but no challenge payload was supplied",
                    )));
                };
                self.state = ThreeDsState::ChallengeRequired;
                self.start_challenge(challenge_payload).await
            }
            AuthenticationStatus::Failed => Err(report!(SdkError::new(
                ErrorCode::ThreeDsFailedValidation,
                &correlation_id,
                "device fingerprinting reported a failed authentication",
            ))),
        }
    }

    /// Decode the challenge envelope, present the vendor challenge UI and
    /// finalize against the backend.
    pub async fn start_challenge(
        &mut self,
        sdk_challenge_payload: Secret<String>,
    ) -> CustomResult<(), SdkError> {
        let correlation_id = self.client.session().correlation_id().to_string();

        let challenge = decode_challenge_payload(sdk_challenge_payload, &correlation_id)?;
        self.state = ThreeDsState::ChallengeInProgress;
        logger::debug!(tag = ?logger::Tag::ThreeDs, transaction_id = %challenge.transaction_id, "presenting challenge");

        let event = self
            .challenger
            .present(challenge.transaction_id.clone(), challenge.payload.clone())
            .await
            .map_err(|error| {
                report!(SdkError::new(
                    ErrorCode::ThreeDsSessionFailure,
                    &correlation_id,
                    format!("challenge presentation failed: {error:?}"),
                ))
            })?;

        let validation_jwt = match event {
            ChallengeEvent::Cancelled => {
                return Err(report!(SdkError::new(
                    ErrorCode::ThreeDsUserCancelled,
                    &correlation_id,
                    "user abandoned the challenge",
                )))
            }
            ChallengeEvent::Completed { validation_jwt } => validation_jwt,
        };
        let Some(validation_jwt) = validation_jwt else {
            // The vendor callback fired without a JWT; tolerated, but there
            // is nothing to finalize with.
            return Err(report!(SdkError::new(
                ErrorCode::ThreeDsSessionFailure,
                &correlation_id,
                "challenge completed without a validation token",
            )));
        };

        let finalize_response = self
            .client
            .finalize_authentication(
                &challenge.account_id,
                &challenge.id,
                &FinalizeRequest {
                    payload: validation_jwt,
                },
            )
            .await?;

        let accepted = matches!(finalize_response.status, AuthenticationStatus::Completed)
            && finalize_response
                .three_d_result
                .map_or(false, |result| result.is_accepted());
        if accepted {
            self.state = ThreeDsState::Finalized;
            Ok(())
        } else {
            Err(report!(SdkError::new(
                ErrorCode::ThreeDsFailedValidation,
                &correlation_id,
                format!(
                    "finalize returned status {} result {:?}",
                    finalize_response.status, finalize_response.three_d_result
                ),
            )))
        }
    }
}

fn decode_challenge_payload(
    sdk_challenge_payload: Secret<String>,
    correlation_id: &str,
) -> CustomResult<ChallengePayload, SdkError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(sdk_challenge_payload.expose())
        .map_err(|error| {
            report!(SdkError::new(
                ErrorCode::ThreeDsChallengePayloadError,
                correlation_id,
                format!("challenge payload is not valid base64: {error}"),
            ))
        })?;
    bytes
        .parse_struct("ChallengePayload")
        .map_err(|error| {
            report!(SdkError::new(
                ErrorCode::ThreeDsChallengePayloadError,
                correlation_id,
                format!("challenge payload envelope did not parse: {error:?}"),
            ))
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use masking::PeekInterface;

    use super::*;

    #[test]
    fn challenge_payload_decodes_from_base64_envelope() {
        let envelope = serde_json::json!({
            "id": "auth-1",
            "transactionId": "txn-9",
            "payload": "cca-payload",
            "accountId": "1002696790",
        });
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(serde_json::to_vec(&envelope).unwrap());

        let decoded =
            decode_challenge_payload(Secret::new(encoded), "corr").expect("must decode");
        assert_eq!(decoded.id, "auth-1");
        assert_eq!(decoded.transaction_id, "txn-9");
        assert_eq!(decoded.account_id, "1002696790");
        assert_eq!(decoded.payload.peek(), "cca-payload");
    }

    #[test]
    fn garbage_challenge_payload_is_a_payload_error() {
        let error = decode_challenge_payload(Secret::new("%%%".to_string()), "corr")
            .expect_err("must fail");
        assert_eq!(
            error.current_context().error_code,
            ErrorCode::ThreeDsChallengePayloadError
        );

        let not_json = base64::engine::general_purpose::STANDARD.encode(b"not json");
        let error = decode_challenge_payload(Secret::new(not_json), "corr")
            .expect_err("must fail");
        assert_eq!(
            error.current_context().error_code,
            ErrorCode::ThreeDsChallengePayloadError
        );
    }
}
