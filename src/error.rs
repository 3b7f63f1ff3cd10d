//! Gateway Error Taxonomy
//!
//! Every remote call resolves to either a parsed value or one of these
//! variants. Expected outcomes (invalid credentials, validation failures)
//! are values or dedicated variants, never panics.

use thiserror::Error;

/// Error types for remote resource operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 401 - access token rejected; a refresh may be worth attempting
    #[error("unauthorized")]
    Unauthorized,

    /// 403 - authenticated but not allowed; refresh will not help
    #[error("forbidden")]
    Forbidden,

    /// 404
    #[error("not found")]
    NotFound,

    /// 400/422 - request rejected with a reason the operator should see inline
    #[error("validation failed: {0}")]
    Validation(String),

    /// 5xx
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Transport failure or a response body that failed to parse
    #[error("network error: {0}")]
    Network(String),
}

impl GatewayError {
    /// Map a non-2xx status and its `{error}` body to a variant
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 422 => Self::Validation(message),
            s if s >= 500 => Self::Server { status: s, message },
            // Unexpected 3xx/4xx: treat as a server-side contract break
            s => Self::Server { status: s, message },
        }
    }

    /// True for failures worth surfacing as a generic transient-failure
    /// notice rather than inline next to a field
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Network(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
