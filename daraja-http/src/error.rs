//! Error types for the Daraja HTTP client.
//!
//! Every stage of a call reports failure through [`DarajaError`]; nothing is
//! retried and nothing terminates the process.

use std::fmt;

use daraja::{ConfigError, CredentialError, ValidationError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Error body returned by the gateway with a non-200 status.
///
/// All body fields are optional on the wire and default to empty. The HTTP
/// status is attached after decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// Gateway request identifier.
    #[serde(rename = "requestId")]
    pub request_id: String,

    /// Gateway error code, e.g. `"500.001.1001"`.
    #[serde(rename = "errorCode")]
    pub error_code: String,

    /// Human-readable error message.
    #[serde(rename = "errorMessage")]
    pub error_message: String,

    /// HTTP status line text, e.g. `"400 Bad Request"`.
    #[serde(skip)]
    pub status: String,

    /// Numeric HTTP status code.
    #[serde(skip)]
    pub status_code: u16,
}

impl ApiError {
    /// Decodes an error body, tolerating bodies that are empty or not JSON.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let mut error: Self = serde_json::from_slice(body).unwrap_or_default();
        error.status = status
            .canonical_reason()
            .map(|reason| format!("{} {reason}", status.as_u16()))
            .unwrap_or_default();
        error.status_code = status.as_u16();
        error
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.error_message.is_empty() {
            f.write_str(&self.error_message)
        } else if !self.status.is_empty() {
            f.write_str(&self.status)
        } else {
            write!(f, "API error, status code: {}", self.status_code)
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by [`DarajaClient`](crate::DarajaClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum DarajaError {
    /// The client configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The security credential could not be derived; nothing was sent.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// HTTP transport error, including timeouts.
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The request payload could not be serialized.
    #[error("Failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// A 200 response body did not match the expected shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// The gateway answered with a non-200 status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token endpoint answered without an access token.
    #[error("token response did not contain an access token")]
    MissingAccessToken,
}

impl DarajaError {
    /// Returns `true` if the error is a request timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    /// Returns the gateway error, if the call failed with a non-200 status.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}
