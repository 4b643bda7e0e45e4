//! Error response shapes shared by Easner services.

use serde::{Deserialize, Serialize};

/// Body returned to HTTP callers when a request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Field that caused rejection (if applicable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorBody {
    /// Create a new error body.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    /// Create with field.
    pub fn with_field(
        code: impl Into<String>,
        message: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// Implemented by error types that can be surfaced over HTTP.
pub trait ApiError: std::error::Error {
    /// Stable error code.
    fn error_code(&self) -> &'static str;

    /// HTTP status the error maps to.
    fn status_code(&self) -> u16;

    /// Request field the error refers to, if any.
    fn field(&self) -> Option<&'static str> {
        None
    }

    /// Whether the caller (not the server) is at fault.
    fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Render the error as a response body.
    fn to_body(&self) -> ErrorBody {
        match self.field() {
            Some(field) => ErrorBody::with_field(self.error_code(), self.to_string(), field),
            None => ErrorBody::new(self.error_code(), self.to_string()),
        }
    }
}
