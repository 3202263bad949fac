//! Errors and error specific types for universal use.

/// A [`Result`] whose error variant is wrapped in an [`error_stack::Report`],
/// allowing context changes and printable attachments along the way up.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Failure while serializing to, or deserializing from, a wire format.
#[derive(Debug, thiserror::Error)]
#[error("Parsing error")]
pub struct ParsingError;

/// Validation errors for locally checked values.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The provided input is missing a required field.
    #[error("Missing required field: {field_name}")]
    MissingRequiredField {
        /// Name of the missing field.
        field_name: String,
    },

    /// An incorrect value was provided for the field specified by `field_name`.
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided {
        /// Name of the offending field.
        field_name: &'static str,
    },

    /// An invalid input was provided.
    #[error("{message}")]
    InvalidValue {
        /// What was wrong with the value.
        message: String,
    },
}
