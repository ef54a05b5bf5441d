//! Error types for the Invest OpenAPI client.

use thiserror::Error;

/// Type alias for Result using the client error type.
pub type Result<T> = std::result::Result<T, InvestApiError>;

/// Errors returned by [`InvestApiClient`](crate::InvestApiClient) implementations.
#[derive(Error, Debug)]
pub enum InvestApiError {
    /// The access token was rejected by the API (HTTP 401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The HTTP request could not be built or sent, or timed out.
    #[error("Request failed: {0}")]
    Request(String),

    /// The API answered with an error status or an error envelope.
    #[error("API error: {message}{}", tracking_suffix(.tracking_id))]
    Api {
        /// Upstream message, or the HTTP status when the body had none
        message: String,
        /// Upstream error code, if any
        code: Option<String>,
        /// Tracking id reported by the API, useful for support requests
        tracking_id: Option<String>,
    },

    /// The response body could not be parsed.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The client was configured with invalid settings.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

fn tracking_suffix(tracking_id: &Option<String>) -> String {
    match tracking_id {
        Some(id) => format!(" (tracking id {})", id),
        None => String::new(),
    }
}

impl InvestApiError {
    /// Whether the error means the token is not accepted.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, InvestApiError::Unauthorized(_))
    }
}
