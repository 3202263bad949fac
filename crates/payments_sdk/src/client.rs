//! Business-level operations against the payment hub and 3DS APIs.
//!
//! Transport failures become [`SdkError`]s here, at the first boundary that
//! observes them; orchestrators above see only the unified taxonomy.

use api_models::{
    enums::PaymentType,
    payment_handles::{PaymentHandle, PaymentHandleRequest, UpdateNonceRequest},
    payment_methods::{PaymentMethod, PaymentMethodsResponse},
    three_ds::{FinalizeRequest, FinalizeResponse, JwtRequest, JwtResponse},
};
use common_utils::{
    errors::CustomResult,
    ext_traits::BytesExt,
    request::{Method, RequestBody, RequestBuilder},
    validation,
};
use error_stack::{report, ResultExt};
use masking::{PeekInterface, Secret};
use sdk_env::logger;
use serde::de::DeserializeOwned;

use crate::{
    configs::SdkSession,
    consts,
    errors::{ErrorCode, GatewayError, SdkError},
};

/// Sentinel for 2xx responses whose body is empty or irrelevant.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyResponse;

impl<'de> serde::Deserialize<'de> for EmptyResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Self)
    }
}

/// Client for the payment hub endpoints of one session.
#[derive(Clone, Debug)]
pub struct PaymentHubClient {
    session: SdkSession,
}

impl PaymentHubClient {
    /// Build a client over `session`.
    pub fn new(session: SdkSession) -> Self {
        Self { session }
    }

    /// The session this client operates in.
    pub fn session(&self) -> &SdkSession {
        &self.session
    }

    async fn call<Req, Resp>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Req>,
    ) -> CustomResult<Resp, GatewayError>
    where
        Req: serde::Serialize + std::fmt::Debug,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.session.base_url(), path);
        let mut builder = RequestBuilder::new()
            .method(method)
            .url(&url)
            .headers(self.session.base_headers());
        if let Some(body) = body {
            builder = builder.set_body(
                RequestBody::from_json(body).change_context(GatewayError::EncodingError)?,
            );
        }

        let response = self.session.gateway().perform(builder.build()).await?;

        if response.response.is_empty() {
            return serde_json::from_slice(b"null")
                .change_context(GatewayError::InvalidResponse)
                .attach_printable("Server returned an empty body where content was expected");
        }
        response
            .response
            .parse_struct(std::any::type_name::<Resp>())
            .change_context(GatewayError::InvalidResponse)
    }

    /// Fetch the merchant's configured payment method for the rail,
    /// currency and account. Local shape checks run before any network
    /// traffic.
    pub async fn get_payment_method(
        &self,
        payment_type: PaymentType,
        currency_code: &str,
        account_id: &str,
    ) -> CustomResult<PaymentMethod, SdkError> {
        let correlation_id = self.session.correlation_id();

        if !validation::is_valid_currency_code(currency_code) {
            return Err(report!(SdkError::new(
                ErrorCode::InvalidCurrencyCode,
                correlation_id,
                format!("currency code {currency_code} is not a three-letter ISO code"),
            )));
        }
        if !validation::is_numeric_account_id(account_id) {
            return Err(report!(SdkError::new(
                ErrorCode::CoreInvalidAccountId,
                correlation_id,
                "account id must be numeric",
            )));
        }

        let path = format!(
            "{}?currencyCode={currency_code}",
            consts::paths::PAYMENT_METHODS
        );
        let response: PaymentMethodsResponse = self
            .call::<(), _>(Method::Get, &path, None)
            .await
            .map_err(|error| report!(SdkError::from_gateway(error, correlation_id)))?;

        let mut rail_methods = response
            .payment_methods
            .into_iter()
            .filter(|method| {
                method.payment_method == payment_type && method.currency_code == currency_code
            })
            .peekable();

        if rail_methods.peek().is_none() {
            return Err(report!(SdkError::new(
                ErrorCode::CoreFailedToFetchAvailablePayments,
                correlation_id,
                format!("no {payment_type} method configured for {currency_code}"),
            )));
        }
        rail_methods
            .find(|method| method.account_id == account_id)
            .ok_or_else(|| {
                report!(SdkError::new(
                    ErrorCode::CoreInvalidAccountId,
                    correlation_id,
                    format!("account {account_id} does not carry the configured method"),
                ))
            })
    }

    /// Create a payment handle (the tokenize call).
    pub async fn create_payment_handle(
        &self,
        request: &PaymentHandleRequest,
    ) -> CustomResult<PaymentHandle, SdkError> {
        self.call(Method::Post, consts::paths::PAYMENT_HANDLES, Some(request))
            .await
            .map_err(|error| {
                report!(SdkError::from_gateway(
                    error,
                    self.session.correlation_id()
                ))
            })
    }

    /// Poll the handle until it is payable, waiting the fixed delay between
    /// attempts. Asynchronous settlement (a provider webhook landing on the
    /// backend) is what the polling rides out; exhausting the retries is a
    /// terminal error, not an invitation to keep waiting.
    pub async fn refresh_payment_token(
        &self,
        payment_handle_token: Secret<String>,
        retry_count: u32,
        delay: std::time::Duration,
    ) -> CustomResult<Secret<String>, SdkError> {
        let correlation_id = self.session.correlation_id();
        let path = format!(
            "{}/{}",
            consts::paths::PAYMENT_HANDLES,
            payment_handle_token.peek()
        );

        for attempt in 1..=retry_count {
            let handle: PaymentHandle = self
                .call::<(), _>(Method::Get, &path, None)
                .await
                .map_err(|error| report!(SdkError::from_gateway(error, correlation_id)))?;

            if handle.status.is_terminal_success() {
                return Ok(handle.payment_handle_token);
            }
            if handle.status.is_terminal_failure() {
                return Err(report!(SdkError::new(
                    ErrorCode::GenericApiError,
                    correlation_id,
                    format!("payment handle reached status {} while refreshing", handle.status),
                )));
            }

            logger::debug!(attempt, status = %handle.status, "payment handle not payable yet");
            if attempt < retry_count {
                tokio::time::sleep(delay).await;
            }
        }

        Err(report!(SdkError::new(
            ErrorCode::TimeoutError,
            correlation_id,
            "payment handle did not become payable within the retry budget",
        )))
    }

    /// Report a processor-issued payment-method nonce back to the backend.
    pub async fn update_payment_nonce(
        &self,
        request: &UpdateNonceRequest,
    ) -> CustomResult<bool, SdkError> {
        self.call::<_, EmptyResponse>(Method::Post, consts::paths::PAYMENT_NONCES, Some(request))
            .await
            .map(|_| true)
            .map_err(|error| {
                report!(SdkError::from_gateway(
                    error,
                    self.session.correlation_id()
                ))
            })
    }

    /// Obtain a 3DS JWT. Failures land in the 3DS error space.
    pub async fn request_authentication_jwt(
        &self,
        request: &JwtRequest,
    ) -> CustomResult<JwtResponse, SdkError> {
        self.call(Method::Post, consts::paths::THREEDS_JWT, Some(request))
            .await
            .map_err(|error| {
                let correlation_id = self.session.correlation_id();
                if matches!(error.current_context(), GatewayError::Timeout) {
                    report!(SdkError::from_gateway_three_ds(error, correlation_id))
                } else {
                    report!(SdkError::new(
                        ErrorCode::ThreeDsJwtFailure,
                        correlation_id,
                        format!("{error:?}"),
                    ))
                }
            })
    }

    /// Finalize a challenge-backed authentication.
    pub async fn finalize_authentication(
        &self,
        account_id: &str,
        authentication_id: &str,
        request: &FinalizeRequest,
    ) -> CustomResult<FinalizeResponse, SdkError> {
        let path = consts::paths::threeds_finalize(account_id, authentication_id);
        self.call(Method::Post, &path, Some(request))
            .await
            .map_err(|error| {
                report!(SdkError::from_gateway_three_ds(
                    error,
                    self.session.correlation_id()
                ))
            })
    }
}
