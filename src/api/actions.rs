//! Capabilities shared by several kinds of things.
//!
//! Handles hand these out only where Reddit supports the action: a
//! submission can be voted on, saved, replied to and edited; a subreddit
//! can do none of these. Each capability is a small value holding the
//! target fullname, so it can outlive the handle it came from.

use std::sync::Arc;

use serde_json::Value;

use crate::client::{ApiRequest, ClientInner};
use crate::models::{Comment, Fullname, Listable};
use crate::{Error, Result};

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    /// Upvote
    Up,
    /// Remove any vote
    Clear,
    /// Downvote
    Down,
}

impl VoteDirection {
    fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Up => "1",
            VoteDirection::Clear => "0",
            VoteDirection::Down => "-1",
        }
    }
}

/// Voting on a submission or comment.
#[derive(Clone)]
pub struct Votable {
    inner: Arc<ClientInner>,
    target: Fullname,
}

impl Votable {
    pub(crate) fn new(inner: Arc<ClientInner>, target: Fullname) -> Self {
        Self { inner, target }
    }

    /// Cast a vote.
    pub async fn vote(&self, direction: VoteDirection) -> Result<()> {
        let request = ApiRequest::post("/api/vote")
            .form([("id", self.target.as_str()), ("dir", direction.as_str())]);
        self.inner.execute(request).await?;
        Ok(())
    }

    /// Upvote.
    pub async fn upvote(&self) -> Result<()> {
        self.vote(VoteDirection::Up).await
    }

    /// Downvote.
    pub async fn downvote(&self) -> Result<()> {
        self.vote(VoteDirection::Down).await
    }

    /// Remove the current vote.
    pub async fn clear_vote(&self) -> Result<()> {
        self.vote(VoteDirection::Clear).await
    }
}

/// Saving to the authenticated account.
#[derive(Clone)]
pub struct Savable {
    inner: Arc<ClientInner>,
    target: Fullname,
}

impl Savable {
    pub(crate) fn new(inner: Arc<ClientInner>, target: Fullname) -> Self {
        Self { inner, target }
    }

    /// Save, optionally into a category (Reddit Premium only).
    pub async fn save(&self, category: Option<&str>) -> Result<()> {
        let mut request = ApiRequest::post("/api/save").form([("id", self.target.as_str())]);
        if let Some(category) = category {
            request = request.form([("category", category)]);
        }
        self.inner.execute(request).await?;
        Ok(())
    }

    /// Remove from saved items.
    pub async fn unsave(&self) -> Result<()> {
        let request = ApiRequest::post("/api/unsave").form([("id", self.target.as_str())]);
        self.inner.execute(request).await?;
        Ok(())
    }
}

/// Replying with a comment.
#[derive(Clone)]
pub struct Replyable {
    inner: Arc<ClientInner>,
    target: Fullname,
}

impl Replyable {
    pub(crate) fn new(inner: Arc<ClientInner>, target: Fullname) -> Self {
        Self { inner, target }
    }

    /// Post a markdown reply and return the new comment.
    pub async fn reply(&self, body: &str) -> Result<Comment> {
        if body.trim().is_empty() {
            return Err(Error::InvalidInput("reply body must not be empty".to_string()));
        }
        let request = ApiRequest::post("/api/comment").form([
            ("thing_id", self.target.as_str()),
            ("text", body),
            ("api_type", "json"),
        ]);
        let value = self.inner.execute(request).await?;
        first_thing(value)
    }
}

/// Editing or deleting the authenticated user's own content.
#[derive(Clone)]
pub struct Editable {
    inner: Arc<ClientInner>,
    target: Fullname,
}

impl Editable {
    pub(crate) fn new(inner: Arc<ClientInner>, target: Fullname) -> Self {
        Self { inner, target }
    }

    /// Replace the markdown body and return the raw updated thing.
    pub async fn edit(&self, body: &str) -> Result<Value> {
        let request = ApiRequest::post("/api/editusertext").form([
            ("thing_id", self.target.as_str()),
            ("text", body),
            ("api_type", "json"),
        ]);
        let value = self.inner.execute(request).await?;
        value
            .pointer("/json/data/things/0/data")
            .cloned()
            .ok_or_else(|| Error::InvalidInput("edit response carried no thing".to_string()))
    }

    /// Delete the content.
    pub async fn delete(&self) -> Result<()> {
        let request = ApiRequest::post("/api/del").form([("id", self.target.as_str())]);
        self.inner.execute(request).await?;
        Ok(())
    }
}

/// The first thing of an `api_type=json` response.
fn first_thing<T: Listable>(value: Value) -> Result<T> {
    let thing = value
        .pointer("/json/data/things/0")
        .ok_or_else(|| Error::InvalidInput("response carried no thing".to_string()))?;
    let kind = thing.get("kind").and_then(Value::as_str).unwrap_or_default();
    let data = thing.get("data").cloned().unwrap_or_default();
    T::from_thing(kind, data)
}

macro_rules! impl_debug {
    ($($name:ident),*) => {
        $(
            impl std::fmt::Debug for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(stringify!($name))
                        .field("target", &self.target)
                        .finish()
                }
            }
        )*
    };
}

impl_debug!(Votable, Savable, Replyable, Editable);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vote_direction_wire_values() {
        assert_eq!(VoteDirection::Up.as_str(), "1");
        assert_eq!(VoteDirection::Clear.as_str(), "0");
        assert_eq!(VoteDirection::Down.as_str(), "-1");
    }

    #[test]
    fn test_first_thing_parses_comment() {
        let value = json!({"json": {"errors": [], "data": {"things": [
            {"kind": "t1", "data": {"id": "c1", "name": "t1_c1", "body": "hello", "link_id": "t3_a", "parent_id": "t3_a"}}
        ]}}});
        let comment: Comment = first_thing(value).unwrap();
        assert_eq!(comment.body, "hello");
        assert!(comment.is_root());
    }

    #[test]
    fn test_first_thing_requires_a_thing() {
        let value = json!({"json": {"errors": [], "data": {"things": []}}});
        assert!(first_thing::<Comment>(value).is_err());
    }
}
