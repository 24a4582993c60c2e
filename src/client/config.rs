//! Client configuration options.

use std::time::Duration;

/// Default OAuth API host.
pub const OAUTH_URL: &str = "https://oauth.reddit.com";
/// Default host for the token endpoint.
pub const REDDIT_URL: &str = "https://www.reddit.com";

/// Configuration for the Reddit client.
///
/// # Example
///
/// ```
/// use reddit_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("linux:my-bot:v1.0 (by /u/someone)")
///     .with_ratelimit_seconds(10);
/// assert_eq!(config.ratelimit_seconds, 10);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Base URL for authenticated API calls
    pub oauth_url: String,
    /// Base URL for the token endpoint
    pub reddit_url: String,
    /// Longest server-requested wait (in seconds) the client sleeps through
    /// before retrying; longer waits fail with `RateLimitExceeded`
    pub ratelimit_seconds: u64,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Whether to automatically refresh expired sessions
    pub auto_refresh_session: bool,
    /// Buffer time (in seconds) before expiry to refresh
    pub refresh_buffer_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("reddit-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            oauth_url: OAUTH_URL.to_string(),
            reddit_url: REDDIT_URL.to_string(),
            ratelimit_seconds: 5,
            retry: RetryConfig::default(),
            auto_refresh_session: true,
            refresh_buffer_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Point API calls at another host.
    pub fn with_oauth_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_url = url.into();
        self
    }

    /// Point token requests at another host.
    pub fn with_reddit_url(mut self, url: impl Into<String>) -> Self {
        self.reddit_url = url.into();
        self
    }

    /// Set the rate limit wait ceiling.
    pub fn with_ratelimit_seconds(mut self, secs: u64) -> Self {
        self.ratelimit_seconds = secs;
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable automatic session refresh.
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh_session = enabled;
        self
    }

    /// Set the buffer time before expiry to refresh.
    pub fn with_refresh_buffer(mut self, secs: i64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }

    /// The rate limit wait ceiling as a duration.
    pub fn ratelimit_ceiling(&self) -> Duration {
        Duration::from_secs(self.ratelimit_seconds)
    }
}

/// Configuration for automatic retries.
///
/// Only requests marked safe to retry (GET and other idempotent methods by
/// default) are retried, on transport failures, malformed bodies and the
/// listed status codes, with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_statuses: vec![500, 502, 503, 504, 522],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the initial backoff duration.
    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let backoff_millis = (self.initial_backoff.as_millis() as u64).saturating_mul(factor);
        let max_millis = self.max_backoff.as_millis() as u64;
        Duration::from_millis(backoff_millis.min(max_millis))
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}
