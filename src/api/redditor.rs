//! Redditor handle.

use std::sync::Arc;

use crate::client::{ApiRequest, ClientInner};
use crate::listing::ListingBuilder;
use crate::models::{Comment, Lazy, Listable, Redditor, Submission};
use crate::{Error, Result};

use super::subreddit::parse_thing;

/// A user account, possibly not yet loaded.
///
/// ```no_run
/// use futures_util::TryStreamExt;
///
/// # async fn example(client: reddit_rs::RedditClient) -> reddit_rs::Result<()> {
/// let spez = client.redditor("spez");
/// let recent: Vec<_> = spez.comments().limit(10).build().try_collect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedditorHandle {
    inner: Arc<ClientInner>,
    name: String,
    data: Lazy<Redditor>,
}

impl RedditorHandle {
    pub(crate) fn stub(inner: Arc<ClientInner>, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name
            .trim()
            .trim_start_matches("/u/")
            .trim_start_matches("u/")
            .to_string();
        Self {
            inner,
            name,
            data: Lazy::Stub,
        }
    }

    /// Username.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once [`load`](Self::load) has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_loaded()
    }

    /// The loaded data; fails with [`Error::NotLoaded`] on a stub.
    pub fn data(&self) -> Result<&Redditor> {
        self.data.get("redditor", &self.name)
    }

    /// Fetch the account's `about` data.
    pub async fn load(&mut self) -> Result<&Redditor> {
        if self.name.is_empty() {
            return Err(Error::InvalidInput("redditor name must not be empty".to_string()));
        }
        let value = self
            .inner
            .execute(ApiRequest::get(format!("/user/{}/about", self.name)))
            .await?;
        self.data.set(parse_thing::<Redditor>(value)?);
        self.data()
    }

    /// Submissions by this account, newest first.
    pub fn submissions(&self) -> ListingBuilder<Submission> {
        self.listing("submitted")
    }

    /// Comments by this account, newest first.
    pub fn comments(&self) -> ListingBuilder<Comment> {
        self.listing("comments")
    }

    fn listing<T: Listable>(&self, section: &str) -> ListingBuilder<T> {
        ListingBuilder::new(self.inner.clone(), format!("/user/{}/{}", self.name, section))
    }
}

impl std::fmt::Debug for RedditorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditorHandle")
            .field("name", &self.name)
            .field("loaded", &self.data.is_loaded())
            .finish()
    }
}
