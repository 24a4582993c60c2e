//! Subreddit handle: listings, streams and submitting.

use std::sync::Arc;

use serde_json::Value;

use crate::client::{ApiRequest, ClientInner};
use crate::listing::{ListingBuilder, StreamGenerator, StreamOptions};
use crate::models::{
    Comment, Lazy, Listable, Submission, SubmitResponse, Subreddit, TimeFilter,
};
use crate::{Error, Result};

use super::SubmissionHandle;

/// A subreddit, possibly not yet loaded.
///
/// Listings and streams need only the name, so they work on a stub.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
/// use reddit_rs::models::TimeFilter;
///
/// # async fn example(client: reddit_rs::RedditClient) -> reddit_rs::Result<()> {
/// let mut rust = client.subreddit("rust");
/// let about = rust.load().await?;
/// println!("{} subscribers", about.subscribers.unwrap_or_default());
///
/// let top: Vec<_> = rust.top(TimeFilter::Week).limit(5).build().try_collect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SubredditHandle {
    inner: Arc<ClientInner>,
    name: String,
    data: Lazy<Subreddit>,
}

impl SubredditHandle {
    pub(crate) fn stub(inner: Arc<ClientInner>, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name
            .trim()
            .trim_start_matches("/r/")
            .trim_start_matches("r/")
            .to_string();
        Self {
            inner,
            name,
            data: Lazy::Stub,
        }
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once [`load`](Self::load) has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_loaded()
    }

    /// The loaded data; fails with [`Error::NotLoaded`] on a stub.
    pub fn data(&self) -> Result<&Subreddit> {
        self.data.get("subreddit", &self.name)
    }

    /// Fetch the subreddit's `about` data.
    pub async fn load(&mut self) -> Result<&Subreddit> {
        self.check_name()?;
        let value = self
            .inner
            .execute(ApiRequest::get(format!("/r/{}/about", self.name)))
            .await?;
        let subreddit = parse_thing::<Subreddit>(value)?;
        self.data.set(subreddit);
        self.data()
    }

    /// Hot submissions.
    pub fn hot(&self) -> ListingBuilder<Submission> {
        self.listing("hot")
    }

    /// Newest submissions.
    pub fn new(&self) -> ListingBuilder<Submission> {
        self.listing("new")
    }

    /// Rising submissions.
    pub fn rising(&self) -> ListingBuilder<Submission> {
        self.listing("rising")
    }

    /// Top submissions within a time window.
    pub fn top(&self, time: TimeFilter) -> ListingBuilder<Submission> {
        self.listing("top").param("t", time.as_str())
    }

    /// Controversial submissions within a time window.
    pub fn controversial(&self, time: TimeFilter) -> ListingBuilder<Submission> {
        self.listing("controversial").param("t", time.as_str())
    }

    /// Newest comments across the subreddit.
    pub fn comments(&self) -> ListingBuilder<Comment> {
        self.listing("comments")
    }

    /// Live streams of new content.
    pub fn stream(&self) -> SubredditStream {
        SubredditStream {
            submissions: self.listing("new"),
            comments: self.listing("comments"),
        }
    }

    /// Submit a self post.
    pub async fn submit_selfpost(&self, title: &str, text: &str) -> Result<SubmissionHandle> {
        self.submit(title, [("kind", "self"), ("text", text)]).await
    }

    /// Submit a link.
    pub async fn submit_link(&self, title: &str, url: &str) -> Result<SubmissionHandle> {
        url::Url::parse(url)?;
        self.submit(title, [("kind", "link"), ("url", url)]).await
    }

    async fn submit(&self, title: &str, fields: [(&str, &str); 2]) -> Result<SubmissionHandle> {
        self.check_name()?;
        if title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }

        let request = ApiRequest::post("/api/submit")
            .form([
                ("sr", self.name.as_str()),
                ("title", title),
                ("api_type", "json"),
                ("resubmit", "true"),
            ])
            .form(fields);
        let value = self.inner.execute(request).await?;

        let data = value
            .pointer("/json/data")
            .cloned()
            .ok_or_else(|| Error::InvalidInput("submit response carried no data".to_string()))?;
        let response: SubmitResponse = serde_json::from_value(data)?;
        tracing::debug!(subreddit = %self.name, id = %response.id, "submitted post");
        Ok(SubmissionHandle::stub(self.inner.clone(), response.id))
    }

    fn listing<T: Listable>(&self, sort: &str) -> ListingBuilder<T> {
        ListingBuilder::new(self.inner.clone(), format!("/r/{}/{}", self.name, sort))
    }

    fn check_name(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidInput("subreddit name must not be empty".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SubredditHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubredditHandle")
            .field("name", &self.name)
            .field("loaded", &self.data.is_loaded())
            .finish()
    }
}

/// Streams of a subreddit's new submissions and comments.
pub struct SubredditStream {
    submissions: ListingBuilder<Submission>,
    comments: ListingBuilder<Comment>,
}

impl SubredditStream {
    /// New submissions as they are posted.
    pub fn submissions(self, options: StreamOptions) -> StreamGenerator<Submission> {
        self.submissions.stream(options)
    }

    /// New comments as they are posted.
    pub fn comments(self, options: StreamOptions) -> StreamGenerator<Comment> {
        self.comments.stream(options)
    }
}

impl std::fmt::Debug for SubredditStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubredditStream").finish_non_exhaustive()
    }
}

/// Parse a single `{kind, data}` object.
pub(crate) fn parse_thing<T: Listable>(value: Value) -> Result<T> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let data = value.get("data").cloned().unwrap_or_default();
    T::from_thing(&kind, data)
}
