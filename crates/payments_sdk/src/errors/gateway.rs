//! Transport-level failures, produced by the networking gateway and mapped
//! into [`super::SdkError`] at the API client boundary.

/// Everything that can go wrong between building a request and decoding its
/// response.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request URL did not parse.
    #[error("URL could not be parsed")]
    InvalidUrl,

    /// A 2xx response body did not decode to the expected type.
    #[error("Response body could not be decoded")]
    InvalidResponse,

    /// The request body could not be encoded to JSON.
    #[error("Request body could not be encoded")]
    EncodingError,

    /// The request exceeded the fixed gateway timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server was unreachable.
    #[error("No connection to server")]
    NoConnection,

    /// The server answered non-2xx with a parseable error envelope.
    #[error("Server error {status_code}: {code} {message}")]
    Api {
        /// HTTP status of the response.
        status_code: u16,
        /// Stable error code from the envelope.
        code: String,
        /// Human-readable message from the envelope.
        message: String,
    },

    /// The server answered non-2xx without a parseable envelope, or failed
    /// in a way no other variant describes.
    #[error("Unexpected server response")]
    Generic,
}

impl GatewayError {
    /// HTTP status carried by an [`GatewayError::Api`] response, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
