//! Submission and comment handles.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Comment, Fullname, Kind, Lazy, Submission, Thing};
use crate::{Error, Result};

use super::{Editable, Replyable, Savable, Votable};

/// Strip a `t3_`-style prefix if the caller passed a fullname.
fn base_id(id: String, kind: Kind) -> String {
    match id.strip_prefix(kind.prefix()).and_then(|rest| rest.strip_prefix('_')) {
        Some(rest) => rest.to_string(),
        None => id,
    }
}

/// A submission, possibly not yet loaded.
///
/// ```no_run
/// # async fn example(client: reddit_rs::RedditClient) -> reddit_rs::Result<()> {
/// let mut post = client.submission("1abcde");
/// assert!(post.data().is_err());
///
/// let title = post.load().await?.title.clone();
/// post.votable().upvote().await?;
/// post.replyable().reply(&format!("Re: {title}")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SubmissionHandle {
    inner: Arc<ClientInner>,
    id: String,
    data: Lazy<Submission>,
}

impl SubmissionHandle {
    pub(crate) fn stub(inner: Arc<ClientInner>, id: impl Into<String>) -> Self {
        Self {
            inner,
            id: base_id(id.into(), Kind::Link),
            data: Lazy::Stub,
        }
    }

    /// Base-36 id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fullname (`t3_...`).
    pub fn fullname(&self) -> Fullname {
        Fullname::new(Kind::Link, &self.id)
    }

    /// Returns `true` once [`load`](Self::load) has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_loaded()
    }

    /// The loaded data; fails with [`Error::NotLoaded`] on a stub.
    pub fn data(&self) -> Result<&Submission> {
        self.data.get("submission", &self.id)
    }

    /// Fetch the submission.
    pub async fn load(&mut self) -> Result<&Submission> {
        match self.inner.info_one(&self.fullname(), "submission").await? {
            Thing::Submission(submission) => self.data.set(submission),
            other => return Err(unexpected("submission", &other)),
        }
        self.data()
    }

    /// Voting capability.
    pub fn votable(&self) -> Votable {
        Votable::new(self.inner.clone(), self.fullname())
    }

    /// Saving capability.
    pub fn savable(&self) -> Savable {
        Savable::new(self.inner.clone(), self.fullname())
    }

    /// Replying capability.
    pub fn replyable(&self) -> Replyable {
        Replyable::new(self.inner.clone(), self.fullname())
    }

    /// Editing capability; only the author may use it.
    pub fn editable(&self) -> Editable {
        Editable::new(self.inner.clone(), self.fullname())
    }
}

impl std::fmt::Debug for SubmissionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionHandle")
            .field("id", &self.id)
            .field("loaded", &self.data.is_loaded())
            .finish()
    }
}

/// A comment, possibly not yet loaded.
#[derive(Clone)]
pub struct CommentHandle {
    inner: Arc<ClientInner>,
    id: String,
    data: Lazy<Comment>,
}

impl CommentHandle {
    pub(crate) fn stub(inner: Arc<ClientInner>, id: impl Into<String>) -> Self {
        Self {
            inner,
            id: base_id(id.into(), Kind::Comment),
            data: Lazy::Stub,
        }
    }

    /// Base-36 id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fullname (`t1_...`).
    pub fn fullname(&self) -> Fullname {
        Fullname::new(Kind::Comment, &self.id)
    }

    /// Returns `true` once [`load`](Self::load) has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_loaded()
    }

    /// The loaded data; fails with [`Error::NotLoaded`] on a stub.
    pub fn data(&self) -> Result<&Comment> {
        self.data.get("comment", &self.id)
    }

    /// Fetch the comment.
    pub async fn load(&mut self) -> Result<&Comment> {
        match self.inner.info_one(&self.fullname(), "comment").await? {
            Thing::Comment(comment) => self.data.set(comment),
            other => return Err(unexpected("comment", &other)),
        }
        self.data()
    }

    /// The submission this comment belongs to, as a stub.
    ///
    /// Requires the comment to be loaded.
    pub fn submission(&self) -> Result<SubmissionHandle> {
        let link_id = self
            .data()?
            .link_id
            .clone()
            .ok_or_else(|| Error::InvalidInput(format!("comment {} has no link_id", self.id)))?;
        Ok(SubmissionHandle::stub(self.inner.clone(), link_id))
    }

    /// Voting capability.
    pub fn votable(&self) -> Votable {
        Votable::new(self.inner.clone(), self.fullname())
    }

    /// Saving capability.
    pub fn savable(&self) -> Savable {
        Savable::new(self.inner.clone(), self.fullname())
    }

    /// Replying capability.
    pub fn replyable(&self) -> Replyable {
        Replyable::new(self.inner.clone(), self.fullname())
    }

    /// Editing capability; only the author may use it.
    pub fn editable(&self) -> Editable {
        Editable::new(self.inner.clone(), self.fullname())
    }
}

impl std::fmt::Debug for CommentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentHandle")
            .field("id", &self.id)
            .field("loaded", &self.data.is_loaded())
            .finish()
    }
}

fn unexpected(expected: &str, thing: &Thing) -> Error {
    Error::InvalidInput(format!("expected a {expected}, got {}", thing_kind(thing)))
}

fn thing_kind(thing: &Thing) -> &str {
    match thing {
        Thing::Comment(_) => "t1",
        Thing::Redditor(_) => "t2",
        Thing::Submission(_) => "t3",
        Thing::Subreddit(_) => "t5",
        Thing::Other { kind, .. } => kind,
    }
}
