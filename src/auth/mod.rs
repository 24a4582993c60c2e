//! Authentication and session management for the Reddit API.
//!
//! Reddit issues short-lived bearer tokens through its OAuth token
//! endpoint. A [`Session`] obtains one for a set of [`Credentials`] and
//! refreshes it before it expires.
//!
//! # Script apps
//!
//! ```no_run
//! use reddit_rs::{Credentials, RedditClient};
//!
//! # async fn example() -> reddit_rs::Result<()> {
//! let client = RedditClient::login(Credentials::password(
//!     "client-id",
//!     "client-secret",
//!     "bot_account",
//!     "password",
//! ))
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Environment
//!
//! [`Credentials::from_env`] reads `REDDIT_CLIENT_ID`,
//! `REDDIT_CLIENT_SECRET`, `REDDIT_USERNAME`, `REDDIT_PASSWORD` and
//! `REDDIT_REFRESH_TOKEN`.

mod credentials;
mod session;

pub use credentials::{Credentials, Grant, UNTRACKED_DEVICE_ID};
pub use session::Session;
