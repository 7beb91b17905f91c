//! Input validation errors shared by product and order requests.

/// A request body failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent (or blank).
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// A field was present but unusable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Require an optional string field to be present and non-blank.
pub(crate) fn required_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_owned()),
        _ => Err(ValidationError::MissingField(field)),
    }
}
