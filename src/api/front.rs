//! Front page and subreddit discovery listings.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::listing::{ListingBuilder, StreamGenerator, StreamOptions};
use crate::models::{Submission, Subreddit, TimeFilter};

/// The authenticated user's front page.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
///
/// # async fn example(client: reddit_rs::RedditClient) -> reddit_rs::Result<()> {
/// let best: Vec<_> = client.front().best().limit(25).build().try_collect().await?;
/// # Ok(())
/// # }
/// ```
pub struct FrontService {
    inner: Arc<ClientInner>,
}

impl FrontService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Best submissions.
    pub fn best(&self) -> ListingBuilder<Submission> {
        self.listing("/best")
    }

    /// Hot submissions.
    pub fn hot(&self) -> ListingBuilder<Submission> {
        self.listing("/hot")
    }

    /// Newest submissions.
    pub fn new_posts(&self) -> ListingBuilder<Submission> {
        self.listing("/new")
    }

    /// Rising submissions.
    pub fn rising(&self) -> ListingBuilder<Submission> {
        self.listing("/rising")
    }

    /// Top submissions within a time window.
    pub fn top(&self, time: TimeFilter) -> ListingBuilder<Submission> {
        self.listing("/top").param("t", time.as_str())
    }

    /// Controversial submissions within a time window.
    pub fn controversial(&self, time: TimeFilter) -> ListingBuilder<Submission> {
        self.listing("/controversial").param("t", time.as_str())
    }

    fn listing(&self, path: &str) -> ListingBuilder<Submission> {
        ListingBuilder::new(self.inner.clone(), path)
    }
}

/// Subreddit discovery.
pub struct SubredditsService {
    inner: Arc<ClientInner>,
}

impl SubredditsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Newest subreddits.
    pub fn new_subreddits(&self) -> ListingBuilder<Subreddit> {
        self.listing("/subreddits/new")
    }

    /// Most popular subreddits.
    pub fn popular(&self) -> ListingBuilder<Subreddit> {
        self.listing("/subreddits/popular")
    }

    /// Default subreddits.
    pub fn default_subreddits(&self) -> ListingBuilder<Subreddit> {
        self.listing("/subreddits/default")
    }

    /// Subreddits as they are created.
    pub fn stream(&self, options: StreamOptions) -> StreamGenerator<Subreddit> {
        self.new_subreddits().stream(options)
    }

    fn listing(&self, path: &str) -> ListingBuilder<Subreddit> {
        ListingBuilder::new(self.inner.clone(), path)
    }
}
