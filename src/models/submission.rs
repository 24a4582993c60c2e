//! Submission (link and self post) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::thing::{expect_kind, timestamp, Edited, Listable};
use super::Fullname;
use crate::Result;

/// A link or self post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Base-36 id
    pub id: String,
    /// Fullname (`t3_...`)
    pub name: Fullname,
    /// Post title
    #[serde(default)]
    pub title: String,
    /// Author username; `[deleted]` for removed accounts
    #[serde(default)]
    pub author: Option<String>,
    /// Subreddit display name
    #[serde(default)]
    pub subreddit: String,
    /// Fullname of the subreddit
    #[serde(default)]
    pub subreddit_id: Option<String>,
    /// Markdown body of a self post
    #[serde(default)]
    pub selftext: String,
    /// Link target (or the permalink for self posts)
    #[serde(default)]
    pub url: Option<String>,
    /// Path of the comments page
    #[serde(default)]
    pub permalink: String,
    /// Net score
    #[serde(default)]
    pub score: i64,
    /// Ratio of upvotes
    #[serde(default)]
    pub upvote_ratio: Option<f64>,
    /// Number of comments
    #[serde(default)]
    pub num_comments: u64,
    /// Creation time in seconds since the epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Whether this is a self post
    #[serde(default)]
    pub is_self: bool,
    /// NSFW flag
    #[serde(default)]
    pub over_18: bool,
    /// Whether the post is stickied
    #[serde(default)]
    pub stickied: bool,
    /// Whether the post is locked
    #[serde(default)]
    pub locked: bool,
    /// Link flair text
    #[serde(default)]
    pub link_flair_text: Option<String>,
    /// Edit state
    #[serde(default)]
    pub edited: Edited,
    /// The authenticated user's vote, if any
    #[serde(default)]
    pub likes: Option<bool>,
    /// Whether the authenticated user saved this post
    #[serde(default)]
    pub saved: bool,
}

impl Submission {
    /// Creation time.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }
}

impl Listable for Submission {
    fn from_thing(kind: &str, data: Value) -> Result<Self> {
        expect_kind("t3", kind, data)
    }

    fn fullname(&self) -> Fullname {
        self.name.clone()
    }
}

/// What Reddit returns after a successful submit.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Base-36 id of the new post
    pub id: String,
    /// Fullname of the new post
    pub name: Fullname,
    /// Canonical URL
    #[serde(default)]
    pub url: Option<String>,
}
