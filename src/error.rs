//! Error types for the IP Netblocks client.
//!
//! Every failure a caller can observe is a variant of [`IpNetblocksError`].
//! Validation failures are raised before any request leaves the process;
//! HTTP failures are classified by status band; connection-level failures
//! from `reqwest` pass through untouched.

use thiserror::Error;

use crate::models::ErrorMessage;

/// Custom error type for IP Netblocks operations.
#[derive(Debug, Error)]
pub enum IpNetblocksError {
    /// A request parameter failed validation, or no search term was given.
    #[error("Invalid parameter: {0}")]
    Parameter(String),

    /// The configured API key is empty at call time.
    #[error("API key is empty")]
    EmptyApiKey,

    /// The response body is not JSON, or lacks the `result` envelope.
    #[error("Unparsable API response: {message}")]
    UnparsableApiResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The service answered with its error envelope instead of a result.
    #[error("API returned an error: {0}")]
    Response(ErrorMessage),

    /// HTTP 401, 402 or 403.
    #[error("Authentication failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    /// HTTP 400 or 422.
    #[error("Bad request (HTTP {status}): {message}")]
    BadRequest { status: u16, message: String },

    /// Any other HTTP status >= 300.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, TLS or timeout failure reported by the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl IpNetblocksError {
    pub(crate) fn parameter(message: impl Into<String>) -> Self {
        Self::Parameter(message.into())
    }

    pub(crate) fn unparsable(message: impl Into<String>) -> Self {
        Self::UnparsableApiResponse {
            message: message.into(),
            source: None,
        }
    }

    /// True for any input-validation failure, including an empty API key.
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Self::Parameter(_) | Self::EmptyApiKey)
    }

    /// HTTP status carried by the status-band variants.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. }
            | Self::BadRequest { status, .. }
            | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for IpNetblocksError {
    fn from(err: serde_json::Error) -> Self {
        Self::UnparsableApiResponse {
            message: "Could not parse API response".to_string(),
            source: Some(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, IpNetblocksError>;
