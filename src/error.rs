//! Error taxonomy for the Grok client.
//!
//! Every failure is classified once, at the point it is observed, and then
//! propagated unchanged. Nothing in this crate retries or swallows an error.

use std::time::Duration;

/// Classified failure of a Grok API operation.
#[derive(Debug, thiserror::Error)]
pub enum GrokError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// No key was passed and the named environment variable is unset or blank.
    #[error("Configuration error: API key is required. Set the {env_var} environment variable or pass an API key explicitly.")]
    MissingApiKey { env_var: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid API key ({body})")]
    Authentication { body: String },

    #[error("Rate limit exceeded. Please try again later. ({body})")]
    RateLimit {
        body: String,
        /// Value of the `Retry-After` header, when the server sent one.
        retry_after: Option<Duration>,
    },

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl GrokError {
    /// Classify a non-success HTTP status into the matching variant.
    pub fn from_status(status: u16, body: String, retry_after: Option<Duration>) -> Self {
        match status {
            401 => GrokError::Authentication { body },
            429 => GrokError::RateLimit { body, retry_after },
            _ => GrokError::Api { status, body },
        }
    }

    /// Whether this is a configuration problem, detected before any I/O.
    pub fn is_config(&self) -> bool {
        matches!(self, GrokError::Config(_) | GrokError::MissingApiKey { .. })
    }

    /// HTTP status associated with this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GrokError::Authentication { .. } => Some(401),
            GrokError::RateLimit { .. } => Some(429),
            GrokError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same call later could plausibly succeed.
    ///
    /// Purely advisory: the client never acts on it. Callers that want a
    /// retry loop build one themselves (see the `check-credits` binary).
    pub fn is_retryable(&self) -> bool {
        match self {
            GrokError::RateLimit { .. } | GrokError::Network(_) => true,
            GrokError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
