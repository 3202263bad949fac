//! The unified failure value surfaced to callers.
//!
//! Transport and vendor failures are translated into [`SdkError`] exactly
//! once, at the boundary where they are first observed, and carried
//! unchanged from there to the terminal callback.

pub mod gateway;

use error_stack::Report;
pub use gateway::GatewayError;

/// Closed set of failure kinds. 3DS codes occupy their own numeric space so
/// callers can tell an authentication failure from a generic one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum ErrorCode {
    // Transport
    InvalidUrl,
    InvalidResponse,
    EncodingError,
    TimeoutError,
    NoConnectionToServer,
    GenericApiError,

    // Core / configuration
    InvalidApiKey,
    InvalidCurrencyCode,
    CoreInvalidAccountId,
    ImproperlyCreatedMerchantAccountConfig,
    CoreFailedToFetchAvailablePayments,
    SdkNotInitialized,
    TokenizationAlreadyInProgress,

    // Field validation
    InvalidAmount,
    InvalidEmail,
    InvalidFirstName,
    InvalidLastName,
    InvalidPhone,
    InvalidDynamicDescriptor,
    UnsupportedCardBrand,
    InvalidExpiryDate,
    InvalidSecurityCode,

    // Card rail
    CardFailedAuthorization,

    // Apple Pay rail
    ApplePayNotSupported,
    ApplePayUserCancelled,
    ApplePayFailedAuthorization,

    // PayPal rail
    PayPalFailedAuthorization,
    PayPalUserCancelled,

    // Venmo rail
    VenmoFailedAuthorization,
    VenmoUserCancelled,

    // 3DS
    ThreeDsFailedValidation,
    ThreeDsUserCancelled,
    ThreeDsTimeout,
    ThreeDsSessionFailure,
    ThreeDsChallengePayloadError,
    ThreeDsJwtFailure,
}

impl ErrorCode {
    /// Stable numeric code, paired with the variant for the lifetime of the
    /// API.
    pub fn numeric(self) -> u16 {
        match self {
            Self::InvalidUrl => 9001,
            Self::InvalidResponse => 9002,
            Self::EncodingError => 9003,
            Self::TimeoutError => 9004,
            Self::NoConnectionToServer => 9005,
            Self::GenericApiError => 9014,
            Self::InvalidApiKey => 9013,
            Self::InvalidCurrencyCode => 9015,
            Self::CoreInvalidAccountId => 9016,
            Self::ImproperlyCreatedMerchantAccountConfig => 9073,
            Self::CoreFailedToFetchAvailablePayments => 9084,
            Self::SdkNotInitialized => 9202,
            Self::TokenizationAlreadyInProgress => 9203,
            Self::InvalidAmount => 9054,
            Self::InvalidEmail => 9055,
            Self::InvalidFirstName => 9112,
            Self::InvalidLastName => 9113,
            Self::InvalidPhone => 9114,
            Self::InvalidDynamicDescriptor => 9098,
            Self::UnsupportedCardBrand => 9125,
            Self::InvalidExpiryDate => 9133,
            Self::InvalidSecurityCode => 9127,
            Self::CardFailedAuthorization => 9131,
            Self::ApplePayNotSupported => 9086,
            Self::ApplePayUserCancelled => 9042,
            Self::ApplePayFailedAuthorization => 9132,
            Self::PayPalFailedAuthorization => 9171,
            Self::PayPalUserCancelled => 9195,
            Self::VenmoFailedAuthorization => 9291,
            Self::VenmoUserCancelled => 9197,
            Self::ThreeDsFailedValidation => 5001,
            Self::ThreeDsUserCancelled => 5003,
            Self::ThreeDsTimeout => 5004,
            Self::ThreeDsSessionFailure => 5005,
            Self::ThreeDsChallengePayloadError => 5006,
            Self::ThreeDsJwtFailure => 5010,
        }
    }

    /// Whether this code represents the user backing out of a provider UI,
    /// as opposed to a genuine failure. Callers typically suppress alerts
    /// for these.
    pub fn is_user_cancellation(self) -> bool {
        matches!(
            self,
            Self::ApplePayUserCancelled
                | Self::PayPalUserCancelled
                | Self::VenmoUserCancelled
                | Self::ThreeDsUserCancelled
        )
    }
}

/// The failure value delivered to callers and written to telemetry. Built
/// once at the point of detection and never rewrapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdkError {
    /// Failure kind.
    pub error_code: ErrorCode,
    /// Numeric form of `error_code`.
    pub code: u16,
    /// Correlation id of the flow that failed.
    pub correlation_id: String,
    /// Internal detail, for logs. Never shown to end users.
    pub detailed_message: String,
    /// Fixed, non-sensitive message caller UIs may display verbatim.
    pub display_message: String,
}

impl SdkError {
    /// Build an error for `error_code`, stamping the fixed display message.
    pub fn new(
        error_code: ErrorCode,
        correlation_id: impl Into<String>,
        detailed_message: impl Into<String>,
    ) -> Self {
        let code = error_code.numeric();
        Self {
            error_code,
            code,
            correlation_id: correlation_id.into(),
            detailed_message: detailed_message.into(),
            display_message: format!("There was an error ({code}), please contact support."),
        }
    }

    /// Translate a transport failure observed on a payment-hub call.
    pub fn from_gateway(report: Report<GatewayError>, correlation_id: &str) -> Self {
        let detail = format!("{report:?}");
        let error_code = match report.current_context() {
            GatewayError::InvalidUrl => ErrorCode::InvalidUrl,
            GatewayError::InvalidResponse => ErrorCode::InvalidResponse,
            GatewayError::EncodingError => ErrorCode::EncodingError,
            GatewayError::Timeout => ErrorCode::TimeoutError,
            GatewayError::NoConnection => ErrorCode::NoConnectionToServer,
            GatewayError::Api { status_code, .. } if *status_code == 401 => {
                ErrorCode::InvalidApiKey
            }
            GatewayError::Api { .. } | GatewayError::Generic => ErrorCode::GenericApiError,
        };
        Self::new(error_code, correlation_id, detail)
    }

    /// Translate a transport failure observed on a 3DS call; same mapping
    /// discipline, 3DS numeric space.
    pub fn from_gateway_three_ds(report: Report<GatewayError>, correlation_id: &str) -> Self {
        let detail = format!("{report:?}");
        let error_code = match report.current_context() {
            GatewayError::Timeout => ErrorCode::ThreeDsTimeout,
            GatewayError::EncodingError | GatewayError::InvalidResponse => {
                ErrorCode::ThreeDsSessionFailure
            }
            _ => ErrorCode::ThreeDsFailedValidation,
        };
        Self::new(error_code, correlation_id, detail)
    }
}

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.error_code, self.code, self.detailed_message
        )
    }
}

impl std::error::Error for SdkError {}

#[cfg(test)]
mod tests {
    use error_stack::report;

    use super::*;

    #[test]
    fn display_message_is_fixed_and_code_bearing() {
        let error = SdkError::new(ErrorCode::InvalidAmount, "corr-1", "amount out of range");
        assert_eq!(
            error.display_message,
            "There was an error (9054), please contact support."
        );
        assert_eq!(error.code, 9054);
    }

    #[test]
    fn unauthorized_maps_to_invalid_api_key() {
        let report = report!(GatewayError::Api {
            status_code: 401,
            code: "5279".to_string(),
            message: "unauthorized".to_string(),
        });
        let error = SdkError::from_gateway(report, "corr-2");
        assert_eq!(error.error_code, ErrorCode::InvalidApiKey);
    }

    #[test]
    fn three_ds_codes_use_their_own_space() {
        let error = SdkError::from_gateway_three_ds(report!(GatewayError::Timeout), "corr-3");
        assert_eq!(error.error_code, ErrorCode::ThreeDsTimeout);
        assert!(error.code < 9000);
    }

    #[test]
    fn cancellation_codes_are_distinguishable() {
        assert!(ErrorCode::ApplePayUserCancelled.is_user_cancellation());
        assert!(ErrorCode::ThreeDsUserCancelled.is_user_cancellation());
        assert!(!ErrorCode::PayPalFailedAuthorization.is_user_cancellation());
        assert!(!ErrorCode::TimeoutError.is_user_cancellation());
    }
}
