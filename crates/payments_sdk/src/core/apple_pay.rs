//! Apple Pay rail orchestrator.

use std::{
    collections::BTreeSet,
    sync::{atomic::AtomicBool, Arc},
};

use api_models::{enums::PaymentType, payment_handles::PaymentHandleRequest};
use common_utils::{errors::CustomResult, types::MinorUnit};
use error_stack::report;
use masking::Secret;
use sdk_env::{instrument, logger, tracing};

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
        apple_pay::{
            merchant_capabilities, supported_networks, ApplePayFlow, MerchantCapability,
            SummaryItem, SupportedNetwork, WalletPaymentRequest,
        },
        ProviderFlowOutcome,
    },
    types::ApplePayTokenizeOptions,
    vendors::WalletSheetPresenting,
};

/// Apple Pay tokenization context. The supported networks and merchant
/// capabilities are derived from the account configuration once, at
/// initialization, and held for the context's lifetime.
pub struct ApplePayContext {
    session: SdkSession,
    client: PaymentHubClient,
    supported_networks: Vec<SupportedNetwork>,
    merchant_capabilities: BTreeSet<MerchantCapability>,
    presenter: Arc<dyn WalletSheetPresenting>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for ApplePayContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplePayContext")
            .field("supported_networks", &self.supported_networks)
            .finish()
    }
}

impl ApplePayContext {
    /// Verify the device and merchant configuration support Apple Pay and
    /// build the context.
    #[instrument(skip_all)]
    pub async fn initialize(
        session: SdkSession,
        currency_code: &str,
        account_id: &str,
        presenter: Arc<dyn WalletSheetPresenting>,
    ) -> CustomResult<Self, SdkError> {
        if !presenter.is_available() {
            return Err(report!(SdkError::new(
                ErrorCode::ApplePayNotSupported,
                session.correlation_id(),
                "device cannot present a wallet sheet",
            )));
        }

        let client = PaymentHubClient::new(session.clone());
        let payment_method = client
            .get_payment_method(PaymentType::ApplePay, currency_code, account_id)
            .await
            .map_err(|error| {
                session.telemetry().log_error(error.current_context());
                error
            })?;

        let networks = supported_networks(payment_method.account_configuration.as_ref());
        if networks.is_empty() {
            let error = SdkError::new(
                ErrorCode::ImproperlyCreatedMerchantAccountConfig,
                session.correlation_id(),
                "account configuration enables no card networks for the wallet",
            );
            session.telemetry().log_error(&error);
            return Err(report!(error));
        }
        let capabilities = merchant_capabilities(&networks);

        Ok(Self {
            session,
            client,
            supported_networks: networks,
            merchant_capabilities: capabilities,
            presenter,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Networks the wallet sheet will offer.
    pub fn supported_networks(&self) -> &[SupportedNetwork] {
        &self.supported_networks
    }

    /// Capability flags handed to the wallet sheet.
    pub fn merchant_capabilities(&self) -> &BTreeSet<MerchantCapability> {
        &self.merchant_capabilities
    }

    /// Tokenize through Apple Pay; presents the wallet sheet when the
    /// created handle demands authorization.
    #[instrument(skip_all)]
    pub async fn tokenize(
        &self,
        options: &ApplePayTokenizeOptions,
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
                .log_conversion("apple pay handle tokenized"),
            Err(error) => self.session.telemetry().log_error(error.current_context()),
        }
        result
    }

    async fn tokenize_inner(
        &self,
        options: &ApplePayTokenizeOptions,
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
                let wallet_request = WalletPaymentRequest {
                    merchant_identifier: options.merchant_identifier.clone(),
                    country_code: options.country_code.clone(),
                    currency_code: options.options.currency_code.clone(),
                    supported_networks: self.supported_networks.clone(),
                    merchant_capabilities: self.merchant_capabilities.clone(),
                    summary_item: SummaryItem {
                        label: options.summary_label.clone(),
                        amount: MinorUnit::new(options.options.amount),
                    },
                    request_billing_address: options.request_billing_address,
                };

                let outcome = ApplePayFlow::new(Arc::clone(&self.presenter))
                    .initiate_flow(wallet_request)
                    .await
                    .map_err(|error| {
                        report!(SdkError::new(
                            ErrorCode::ApplePayFailedAuthorization,
                            correlation_id,
                            format!("wallet sheet failed: {error:?}"),
                        ))
                    })?;

                match outcome {
                    ProviderFlowOutcome::Success(token) => {
                        logger::debug!(
                            network = ?token.token.payment_method.as_ref().and_then(|method| method.network.as_ref()),
                            "wallet authorization completed"
                        );
                    }
                    ProviderFlowOutcome::Cancelled => {
                        return Err(report!(SdkError::new(
                            ErrorCode::ApplePayUserCancelled,
                            correlation_id,
                            "wallet sheet dismissed without authorization",
                        )));
                    }
                    ProviderFlowOutcome::Failed => {
                        return Err(report!(SdkError::new(
                            ErrorCode::ApplePayFailedAuthorization,
                            correlation_id,
                            "wallet authorization failed",
                        )));
                    }
                }
            }
            HandleDisposition::Dead => {
                return Err(report!(SdkError::new(
                    ErrorCode::ApplePayFailedAuthorization,
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
