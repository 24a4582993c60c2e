//! # reddit-rs
//!
//! An async Rust client for the Reddit API.
//!
//! The crate authenticates against Reddit's OAuth endpoint, dispatches
//! requests under Reddit's rate limits, and turns listings into lazy,
//! cursor-driven [`Stream`](futures_util::Stream)s.
//!
//! ## Features
//!
//! - **Authentication**: password, refresh token, client credentials and
//!   installed-client grants, with automatic token refresh
//! - **Rate limiting**: waits out the `x-ratelimit-*` budget and sleeps
//!   through short "try again in N seconds" errors, failing fast on long ones
//! - **Listings**: [`ListingGenerator`] pages through any listing lazily
//!   and can resume from a saved cursor
//! - **Streams**: [`StreamGenerator`] polls for new submissions, comments or
//!   subreddits, deduplicating with a bounded LRU set and backing off
//!   while nothing new arrives
//! - **Lazy objects**: handles start as stubs and load on request
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures_util::TryStreamExt;
//! use reddit_rs::{Credentials, RedditClient};
//!
//! #[tokio::main]
//! async fn main() -> reddit_rs::Result<()> {
//!     let client = RedditClient::login(Credentials::from_env()?).await?;
//!
//!     let posts: Vec<_> = client
//!         .subreddit("rust")
//!         .new()
//!         .limit(50)
//!         .build()
//!         .try_collect()
//!         .await?;
//!     println!("Fetched {} posts", posts.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming Example
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use reddit_rs::{Credentials, RedditClient, StreamEvent, StreamOptions};
//!
//! #[tokio::main]
//! async fn main() -> reddit_rs::Result<()> {
//!     let client = RedditClient::login(Credentials::from_env()?).await?;
//!
//!     let options = StreamOptions::default()
//!         .with_skip_existing(true)
//!         .with_pause_after(Some(5));
//!     let mut submissions = client.subreddit("rust").stream().submissions(options);
//!
//!     while let Some(event) = submissions.next().await {
//!         match event? {
//!             StreamEvent::Item(post) => println!("{}: {}", post.id, post.title),
//!             StreamEvent::Pause => println!("quiet for a while"),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod listing;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, Grant, Session};
pub use client::{ApiRequest, ClientConfig, RedditClient, RetryConfig};
pub use error::{ApiErrorItem, Error, Result};
pub use listing::{
    BoundedSet, ListingGenerator, Page, StreamEvent, StreamGenerator, StreamOptions,
};
pub use models::{Cursor, Fullname, Kind, TimeFilter};

/// Prelude module for convenient imports.
///
/// ```rust
/// use reddit_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        CommentHandle, Editable, RedditorHandle, Replyable, Savable, SubmissionHandle,
        SubredditHandle, Votable, VoteDirection,
    };
    pub use crate::auth::{Credentials, Grant, Session};
    pub use crate::client::{ApiRequest, ClientConfig, RedditClient, RetryConfig};
    pub use crate::error::{Error, Result};
    pub use crate::listing::{
        ListingBuilder, ListingGenerator, StreamEvent, StreamGenerator, StreamOptions,
    };
    pub use crate::models::{
        Comment, Cursor, Fullname, Kind, Listable, Redditor, Submission, Subreddit, Thing,
        TimeFilter,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullname_creation() {
        let name = Fullname::new(Kind::Link, "abc123");
        assert_eq!(name.as_str(), "t3_abc123");
        assert_eq!(name.id(), "abc123");
    }

    #[test]
    fn test_default_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(config.oauth_url, client::OAUTH_URL);
        assert_eq!(config.reddit_url, "https://www.reddit.com");
    }

    #[test]
    fn test_time_filter_validation() {
        assert!("week".parse::<TimeFilter>().is_ok());
        assert!("fortnight".parse::<TimeFilter>().is_err());
    }
}
