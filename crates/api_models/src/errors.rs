//! The server error envelope returned on non-2xx responses.

use serde::{Deserialize, Serialize};

/// Envelope wrapping the error body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error payload.
    pub error: ApiError,
}

/// Error payload: a stable machine code plus a human message, with optional
/// field-level detail.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable error code, e.g. "5068".
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Free-form extra detail lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// Per-field validation failures.
    #[serde(rename = "fieldErrors", skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

/// A single field-level failure inside [`ApiError`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldError {
    /// JSON pointer-ish field path.
    pub field: String,
    /// What was wrong with it.
    pub error: String,
}
