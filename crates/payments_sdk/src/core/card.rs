//! Card rail orchestrator: tokenize with 3DS as the authorization step.

use std::sync::{atomic::AtomicBool, Arc};

use api_models::{enums::PaymentType, payment_handles::PaymentHandleRequest};
use common_utils::errors::CustomResult;
use error_stack::report;
use masking::{PeekInterface, Secret};
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
    threeds::ThreeDsService,
    types::CardTokenizeOptions,
    vendors::{ChallengePresenting, FingerprintingSession},
};

/// Card tokenization context for one (currency, account) pair.
pub struct CardContext {
    session: SdkSession,
    client: PaymentHubClient,
    account_id: String,
    fingerprinter: Arc<dyn FingerprintingSession>,
    challenger: Arc<dyn ChallengePresenting>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for CardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardContext")
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl CardContext {
    /// Verify the merchant configuration carries a card method for the
    /// currency and account, and build the context.
    #[instrument(skip_all)]
    pub async fn initialize(
        session: SdkSession,
        currency_code: &str,
        account_id: &str,
        fingerprinter: Arc<dyn FingerprintingSession>,
        challenger: Arc<dyn ChallengePresenting>,
    ) -> CustomResult<Self, SdkError> {
        let client = PaymentHubClient::new(session.clone());
        let payment_method = client
            .get_payment_method(PaymentType::Card, currency_code, account_id)
            .await
            .map_err(|error| {
                session.telemetry().log_error(error.current_context());
                error
            })?;

        Ok(Self {
            session,
            client,
            account_id: payment_method.account_id,
            fingerprinter,
            challenger,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Tokenize a card. Runs 3DS when the created handle demands further
    /// authorization; delivers exactly one terminal result.
    #[instrument(skip_all)]
    pub async fn tokenize(
        &self,
        options: &CardTokenizeOptions,
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
            Ok(_) => self.session.telemetry().log_conversion("card handle tokenized"),
            Err(error) => {
                let error = error.current_context();
                if error.code < 9000 {
                    self.session.telemetry().log_three_ds_error(error);
                } else {
                    self.session.telemetry().log_error(error);
                }
            }
        }
        result
    }

    async fn tokenize_inner(
        &self,
        options: &CardTokenizeOptions,
    ) -> CustomResult<Secret<String>, SdkError> {
        let correlation_id = self.session.correlation_id();

        validate_tokenize_options(&options.options).map_err(|code| {
            report!(SdkError::new(code, correlation_id, "tokenize options failed validation"))
        })?;

        let request = PaymentHandleRequest::try_from(HandleRequestData {
            options,
            return_url_base: self.session.return_url_base(),
        })
        .map_err(|code| {
            report!(SdkError::new(code, correlation_id, "card details failed validation"))
        })?;

        let handle = self.client.create_payment_handle(&request).await?;

        match disposition(&handle) {
            HandleDisposition::Ready => {}
            HandleDisposition::NeedsAuthorization => {
                let card_bin: String =
                    options.card.card_number.peek().chars().take(6).collect();
                let mut three_ds = ThreeDsService::new(
                    self.client.clone(),
                    Arc::clone(&self.fingerprinter),
                    Arc::clone(&self.challenger),
                );
                three_ds
                    .initiate_flow(&self.account_id, Some(card_bin))
                    .await?;
            }
            HandleDisposition::Dead => {
                return Err(report!(SdkError::new(
                    ErrorCode::CardFailedAuthorization,
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
