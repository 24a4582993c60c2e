//! Error types for the Reddit API client.
//!
//! Every fallible operation in this crate returns [`Result`]. The variants
//! carry enough structure (status codes, wait durations, raw bodies) for
//! calling code to branch on them without parsing messages.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Reddit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Reddit API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Building or configuring the HTTP client failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a non-success status
    #[error("Request failed: status={status}, message={message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// The API accepted the request but reported errors in the body
    #[error("API error: {}", format_api_errors(.0))]
    Api(Vec<ApiErrorItem>),

    /// Authentication failed (bad credentials, rejected grant)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Session token has expired and cannot be refreshed
    #[error("Session expired; refresh required")]
    SessionExpired,

    /// The server asked us to wait longer than the configured ceiling
    #[error("Rate limit exceeded; retry after {wait:?}: {message}")]
    RateLimitExceeded {
        /// How long the server asked us to wait
        wait: Duration,
        /// Message the server attached to the rate limit
        message: String,
        /// Raw response body
        body: Value,
    },

    /// Network-level failure after retries were exhausted
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A lazy object was accessed before `load()` was called
    #[error("{kind} {id} has not been loaded; call load() first")]
    NotLoaded {
        /// Object kind, e.g. "submission"
        kind: &'static str,
        /// Identifier of the stub
        id: String,
    },

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A single entry of the `json.errors` array Reddit embeds in responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorItem {
    /// Error type, e.g. `RATELIMIT` or `SUBREDDIT_NOEXIST`
    pub error_type: String,
    /// Human-readable message
    pub message: String,
    /// The request field the error refers to, if any
    pub field: Option<String>,
}

impl ApiErrorItem {
    /// Parse one `[type, message, field]` triple.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let parts = value.as_array()?;
        let text = |i: usize| parts.get(i).and_then(Value::as_str).map(String::from);
        Some(Self {
            error_type: text(0)?,
            message: text(1).unwrap_or_default(),
            field: text(2).filter(|f| !f.is_empty()),
        })
    }
}

fn format_api_errors(items: &[ApiErrorItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}: {}", item.error_type, item.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    ///
    /// # Example
    ///
    /// ```
    /// use reddit_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable() {
    ///         println!("Retrying operation...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::RateLimitExceeded { .. } => true,
            Error::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::SessionExpired)
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::RequestFailed { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) | Error::Config(_) | Error::NotLoaded { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The wait the server asked for, when this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimitExceeded { wait, .. } => Some(*wait),
            _ => None,
        }
    }

    /// Create a request error from a non-success response.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .or_else(|| body.get("reason"))
            .or_else(|| body.get("error"))
            .and_then(|m| match m {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "Unknown API error".to_string());

        Error::RequestFailed {
            status,
            message,
            body,
        }
    }
}
