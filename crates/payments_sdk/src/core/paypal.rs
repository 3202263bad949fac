//! PayPal rail orchestrator.

use std::sync::atomic::AtomicBool;

use api_models::{enums::PaymentType, payment_handles::PaymentHandleRequest};
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
        paypal::{CheckoutStrategy, PayPalFlow},
        ProviderFlowOutcome,
    },
    types::PayPalTokenizeOptions,
};

/// PayPal tokenization context. The checkout render strategy (native or
/// web) is fixed at initialization.
pub struct PayPalContext {
    session: SdkSession,
    client: PaymentHubClient,
    strategy: CheckoutStrategy,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for PayPalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPalContext")
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl PayPalContext {
    /// Verify the merchant configuration carries a PayPal method and build
    /// the context.
    #[instrument(skip_all)]
    pub async fn initialize(
        session: SdkSession,
        currency_code: &str,
        account_id: &str,
        strategy: CheckoutStrategy,
    ) -> CustomResult<Self, SdkError> {
        let client = PaymentHubClient::new(session.clone());
        client
            .get_payment_method(PaymentType::PayPal, currency_code, account_id)
            .await
            .map_err(|error| {
                session.telemetry().log_error(error.current_context());
                error
            })?;

        Ok(Self {
            session,
            client,
            strategy,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Tokenize through PayPal checkout; delivers exactly one terminal
    /// result.
    #[instrument(skip_all)]
    pub async fn tokenize(
        &self,
        options: &PayPalTokenizeOptions,
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
                .log_conversion("paypal handle tokenized"),
            Err(error) => self.session.telemetry().log_error(error.current_context()),
        }
        result
    }

    async fn tokenize_inner(
        &self,
        options: &PayPalTokenizeOptions,
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
            HandleDisposition::Ready => {}
            HandleDisposition::NeedsAuthorization => {
                let outcome = PayPalFlow::new(self.strategy.clone())
                    .initiate_flow(&handle)
                    .await
                    .map_err(|error| {
                        report!(SdkError::new(
                            ErrorCode::PayPalFailedAuthorization,
                            correlation_id,
                            format!("checkout failed: {error:?}"),
                        ))
                    })?;

                match outcome {
                    ProviderFlowOutcome::Success(()) => {}
                    ProviderFlowOutcome::Cancelled => {
                        return Err(report!(SdkError::new(
                            ErrorCode::PayPalUserCancelled,
                            correlation_id,
                            "consumer abandoned checkout",
                        )));
                    }
                    ProviderFlowOutcome::Failed => {
                        return Err(report!(SdkError::new(
                            ErrorCode::PayPalFailedAuthorization,
                            correlation_id,
                            "checkout did not authorize",
                        )));
                    }
                }
            }
            HandleDisposition::Dead => {
                return Err(report!(SdkError::new(
                    ErrorCode::PayPalFailedAuthorization,
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
