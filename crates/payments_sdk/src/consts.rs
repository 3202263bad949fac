//! Crate-wide constants.

use std::time::Duration;

/// Hard timeout applied to every outgoing request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// How many times the token refresh polls before giving up.
pub const TOKEN_REFRESH_RETRY_COUNT: u32 = 3;

/// Fixed delay between token refresh polls. Intentionally flat: the wait is
/// bounded by the retry count, not shaped by backoff.
pub const TOKEN_REFRESH_RETRY_DELAY: Duration = Duration::from_secs(6);

/// Transaction source reported on every request.
pub const TRANSACTION_SOURCE: &str = "MOBILE_SDK";

/// Value sent with the simulator header when an invocation id is configured.
pub const SIMULATOR_EXTERNAL: &str = "EXTERNAL";

/// Fallback base for merchant return links when none is configured.
pub const DEFAULT_RETURN_URL_BASE: &str = "https://mobile-sdk.redirect/return";

/// Header names attached by the gateway.
pub mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const SIMULATOR: &str = "Simulator";
    pub const X_APP_VERSION: &str = "X-App-Version";
    pub const X_INTERNAL_CORRELATION_ID: &str = "X-INTERNAL-CORRELATION-ID";
    pub const X_INVOCATION_ID: &str = "X-Invocation-Id";
    pub const X_TRANSACTION_SOURCE: &str = "X-TransactionSource";
}

/// Endpoint paths, relative to the environment base URL.
pub mod paths {
    pub const PAYMENT_HANDLES: &str = "/paymenthub/v1/paymenthandles";
    pub const PAYMENT_METHODS: &str = "/paymenthub/v1/paymentmethods";
    pub const PAYMENT_NONCES: &str = "/paymenthub/v1/paymentnonces";
    pub const THREEDS_JWT: &str = "/threedsecure/v2/jwt";
    pub const MOBILE_LOG: &str = "/mobile/api/v1/log";
    pub const THREEDS_LOG: &str = "/threedsecure/v2/log";

    /// Finalize path for a challenge-backed authentication.
    pub fn threeds_finalize(account_id: &str, authentication_id: &str) -> String {
        format!("/threedsecure/v2/accounts/{account_id}/authentications/{authentication_id}/finalize")
    }
}
