//! HTTP-flavoured error with a status code, an optional code and metadata

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Metadata attached to a [`CustomError`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorExtra {
    /// Hint describing how a denied actor could obtain access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_options: Option<String>,
    /// Any other metadata, kept verbatim
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ErrorExtra {
    /// Metadata carrying only a remediation hint
    pub fn remediation(option: impl Into<String>) -> Self {
        Self {
            remediation_options: Some(option.into()),
            details: Map::new(),
        }
    }

    /// Attach an arbitrary metadata field
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Error with a numeric status code, an optional error code and metadata
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("CustomError")]
#[serde(rename_all = "camelCase")]
pub struct CustomError {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub extra: ErrorExtra,
}

impl CustomError {
    /// Create a new error; missing metadata becomes an empty [`ErrorExtra`]
    pub fn new(status_code: u16, error: Option<&str>, extra: Option<ErrorExtra>) -> Self {
        Self {
            status_code,
            error: error.map(str::to_string),
            extra: extra.unwrap_or_default(),
        }
    }

    /// Set the remediation hint
    pub fn with_remediation(mut self, option: impl Into<String>) -> Self {
        self.extra.remediation_options = Some(option.into());
        self
    }

    /// The error code, if any
    pub fn code(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The remediation hint from the metadata, if any
    pub fn remediation_options(&self) -> Option<&str> {
        self.extra.remediation_options.as_deref()
    }
}

/// Build an error with an arbitrary status code
pub fn custom(status_code: u16, error: Option<&str>, extra: Option<ErrorExtra>) -> CustomError {
    CustomError::new(status_code, error, extra)
}

/// 400 Bad Request
pub fn bad_request(error: Option<&str>, extra: Option<ErrorExtra>) -> CustomError {
    CustomError::new(400, error, extra)
}

/// 401 Unauthorized
pub fn unauthorized(error: Option<&str>, extra: Option<ErrorExtra>) -> CustomError {
    CustomError::new(401, error, extra)
}

/// 403 Forbidden
pub fn forbidden(error: Option<&str>, extra: Option<ErrorExtra>) -> CustomError {
    CustomError::new(403, error, extra)
}

/// 404 Not Found
pub fn not_found(error: Option<&str>, extra: Option<ErrorExtra>) -> CustomError {
    CustomError::new(404, error, extra)
}

/// 500 Internal Server Error
pub fn internal_server_error(error: Option<&str>, extra: Option<ErrorExtra>) -> CustomError {
    CustomError::new(500, error, extra)
}
