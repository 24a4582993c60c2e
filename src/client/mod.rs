//! HTTP client, request dispatch and rate limiting.
//!
//! [`RedditClient`] is the entry point. Every call it makes goes through
//! one dispatcher that waits out the header-reported rate limit budget,
//! attaches the bearer token, sleeps through short server-requested waits
//! and retries idempotent requests on transient failures.
//!
//! # Example
//!
//! ```no_run
//! use reddit_rs::{ClientConfig, Credentials, RedditClient};
//!
//! # async fn example() -> reddit_rs::Result<()> {
//! let config = ClientConfig::default()
//!     .with_user_agent("linux:my-bot:v0.1 (by /u/me)")
//!     .with_ratelimit_seconds(30);
//! let client = RedditClient::login_with_config(Credentials::from_env()?, config).await?;
//!
//! let me = client.me().await?;
//! println!("logged in as {}", me.name);
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatcher;
mod http;
mod rate_limit;
mod request;
mod transport;

pub use config::{ClientConfig, RetryConfig, OAUTH_URL, REDDIT_URL};
pub use http::RedditClient;
pub use rate_limit::RateLimiter;
pub use request::ApiRequest;
pub use transport::{BasicAuth, Body, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub(crate) use http::ClientInner;
