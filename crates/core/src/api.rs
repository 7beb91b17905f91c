//! JSON envelopes shared by the storefront server and its clients.
//!
//! Success:
//!
//! ```json
//! { "success": true, "data": { ... }, "source": "mongodb", "message": "..." }
//! ```
//!
//! Failure:
//!
//! ```json
//! { "success": false, "error": "missing required field: name" }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Origin, Sourced};

/// Successful response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    /// Diagnostic tag naming the data source. Absent for responses that do
    /// not touch the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Origin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A response without a source tag.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            source: None,
            message: None,
        }
    }

    /// A response tagged with where `data` came from.
    pub const fn sourced(data: T, origin: Origin) -> Self {
        Self {
            success: true,
            data,
            source: Some(origin),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> From<Sourced<T>> for ApiResponse<T> {
    fn from(sourced: Sourced<T>) -> Self {
        Self::sourced(sourced.value, sourced.origin)
    }
}

/// Failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Either envelope, for clients that decode a response before knowing which
/// one they got.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Ok(ApiResponse<T>),
    Err(ApiError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sourced_response_shape() {
        let body = serde_json::to_value(ApiResponse::from(Sourced::fallback(vec![1]))).unwrap();
        assert_eq!(body, json!({"success": true, "data": [1], "source": "mock"}));
    }

    #[test]
    fn test_plain_response_omits_source() {
        let body = serde_json::to_value(ApiResponse::ok("hi").with_message("note")).unwrap();
        assert_eq!(body, json!({"success": true, "data": "hi", "message": "note"}));
    }

    #[test]
    fn test_envelope_decodes_error() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"success": false, "error": "nope"})).unwrap();
        assert!(matches!(env, Envelope::Err(e) if e.error == "nope"));
    }

    #[test]
    fn test_envelope_decodes_success() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"success": true, "data": [4], "source": "mongodb"}))
                .unwrap();
        assert!(matches!(env, Envelope::Ok(r) if r.data == vec![4]));
    }
}
