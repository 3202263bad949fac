//! Venmo rail orchestrator.

use std::sync::{atomic::AtomicBool, Arc};

use api_models::{
    enums::PaymentType,
    payment_handles::{PaymentHandleRequest, UpdateNonceRequest},
};
use common_utils::errors::CustomResult;
use error_stack::report;
use masking::Secret;
use sdk_env::{instrument, tracing};

use super::{
    disposition, transformers::HandleRequestData, validate_tokenize_options, HandleDisposition,
    InFlightGuard,
};
use crate::{
    client::PaymentHubClient,
    configs::SdkSession,
    consts,
    errors::{ErrorCode, SdkError},
    flows::{
        venmo::{self, VenmoFlow},
        ProviderFlowOutcome,
    },
    types::VenmoTokenizeOptions,
    vendors::VenmoAuthorizing,
};

/// Venmo tokenization context.
pub struct VenmoContext {
    session: SdkSession,
    client: PaymentHubClient,
    account_id: String,
    authorizer: Arc<dyn VenmoAuthorizing>,
    app_return_scheme: String,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for VenmoContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VenmoContext")
            .field("account_id", &self.account_id)
            .field("app_return_scheme", &self.app_return_scheme)
            .finish()
    }
}

impl VenmoContext {
    /// Verify the merchant configuration carries a Venmo method and build
    /// the context. `app_return_scheme` is the custom URL scheme the host
    /// app registered for Venmo app-switch returns.
    #[instrument(skip_all)]
    pub async fn initialize(
        session: SdkSession,
        currency_code: &str,
        account_id: &str,
        authorizer: Arc<dyn VenmoAuthorizing>,
        app_return_scheme: impl Into<String>,
    ) -> CustomResult<Self, SdkError> {
        let client = PaymentHubClient::new(session.clone());
        let payment_method = client
            .get_payment_method(PaymentType::Venmo, currency_code, account_id)
            .await
            .map_err(|error| {
                session.telemetry().log_error(error.current_context());
                error
            })?;

        Ok(Self {
            session,
            client,
            account_id: payment_method.account_id,
            authorizer,
            app_return_scheme: app_return_scheme.into(),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Whether an incoming URL-context callback belongs to this flow and
    /// should be forwarded to the vendor SDK. Scheme matching is
    /// case-insensitive.
    pub fn can_handle_return_url(&self, url: &str) -> bool {
        venmo::can_handle_return_url(url, &self.app_return_scheme)
    }

    /// Tokenize through Venmo; delivers exactly one terminal result.
    #[instrument(skip_all)]
    pub async fn tokenize(
        &self,
        options: &VenmoTokenizeOptions,
    ) -> CustomResult<Secret<String>, SdkError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            report!(SdkError::new(
                ErrorCode::TokenizationAlreadyInProgress,
                self.session.correlation_id(),
                "a tokenize flow is already running on this context",
            ))
        })?;

        let result = self.tokenize_inner(options).await;
        match &result {
            Ok(_) => self
                .session
                .telemetry()
                .log_conversion("venmo handle tokenized"),
            Err(error) => self.session.telemetry().log_error(error.current_context()),
        }
        result
    }

    async fn tokenize_inner(
        &self,
        options: &VenmoTokenizeOptions,
    ) -> CustomResult<Secret<String>, SdkError> {
        let correlation_id = self.session.correlation_id();

        validate_tokenize_options(&options.options).map_err(|code| {
            report!(SdkError::new(code, correlation_id, "tokenize options failed validation"))
        })?;

        let request = PaymentHandleRequest::from(HandleRequestData {
            options,
            return_url_base: self.session.return_url_base(),
        });
        let handle = self.client.create_payment_handle(&request).await?;

        match disposition(&handle) {
            // A previously authorized instrument comes back payable and the
            // in-app authorization is skipped entirely.
            HandleDisposition::Ready => {}
            HandleDisposition::NeedsAuthorization => {
                let Some(gateway_response) = handle.gateway_response.clone() else {
                    return Err(report!(SdkError::new(
                        ErrorCode::VenmoFailedAuthorization,
                        correlation_id,
                        "redirect handle carries no gateway response",
                    )));
                };

                let outcome = VenmoFlow::new(Arc::clone(&self.authorizer))
                    .initiate_flow(&gateway_response, options.profile_id.clone())
                    .await
                    .map_err(|error| {
                        report!(SdkError::new(
                            ErrorCode::VenmoFailedAuthorization,
                            correlation_id,
                            format!("venmo authorization failed: {error:?}"),
                        ))
                    })?;

                match outcome {
                    ProviderFlowOutcome::Success(nonce) => {
                        let Some(jwt_token) = gateway_response
                            .jwt_token
                            .clone()
                            .or_else(|| gateway_response.session_token.clone())
                        else {
                            return Err(report!(SdkError::new(
                                ErrorCode::VenmoFailedAuthorization,
                                correlation_id,
                                "gateway response carries no token to report the nonce under",
                            )));
                        };
                        self.client
                            .update_payment_nonce(&UpdateNonceRequest {
                                account_id: self.account_id.clone(),
                                payment_method_nonce: nonce,
                                jwt_token,
                            })
                            .await?;
                    }
                    ProviderFlowOutcome::Cancelled => {
                        return Err(report!(SdkError::new(
                            ErrorCode::VenmoUserCancelled,
                            correlation_id,
                            "consumer abandoned the venmo authorization",
                        )));
                    }
                    ProviderFlowOutcome::Failed => {
                        return Err(report!(SdkError::new(
                            ErrorCode::VenmoFailedAuthorization,
                            correlation_id,
                            "venmo authorization did not produce a nonce",
                        )));
                    }
                }
            }
            HandleDisposition::Dead => {
                return Err(report!(SdkError::new(
                    ErrorCode::VenmoFailedAuthorization,
                    correlation_id,
                    format!("payment handle reached status {}", handle.status),
                )));
            }
        }

        self.client
            .refresh_payment_token(
                handle.payment_handle_token,
                consts::TOKEN_REFRESH_RETRY_COUNT,
                consts::TOKEN_REFRESH_RETRY_DELAY,
            )
            .await
    }
}
