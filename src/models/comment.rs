//! Comment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::thing::{expect_kind, timestamp, Edited, Listable};
use super::Fullname;
use crate::Result;

/// A comment on a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Base-36 id
    pub id: String,
    /// Fullname (`t1_...`)
    pub name: Fullname,
    /// Markdown body
    #[serde(default)]
    pub body: String,
    /// Author username
    #[serde(default)]
    pub author: Option<String>,
    /// Subreddit display name
    #[serde(default)]
    pub subreddit: String,
    /// Fullname of the submission this comment belongs to
    #[serde(default)]
    pub link_id: Option<String>,
    /// Fullname of the parent (submission or comment)
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Path of the comment permalink
    #[serde(default)]
    pub permalink: String,
    /// Net score
    #[serde(default)]
    pub score: i64,
    /// Creation time in seconds since the epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Edit state
    #[serde(default)]
    pub edited: Edited,
    /// Whether the comment is stickied
    #[serde(default)]
    pub stickied: bool,
    /// The authenticated user's vote, if any
    #[serde(default)]
    pub likes: Option<bool>,
    /// Whether the authenticated user saved this comment
    #[serde(default)]
    pub saved: bool,
}

impl Comment {
    /// Creation time.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }

    /// Returns `true` if this comment replies directly to the submission.
    pub fn is_root(&self) -> bool {
        self.parent_id.as_deref().is_some_and(|p| p.starts_with("t3_"))
    }
}

impl Listable for Comment {
    fn from_thing(kind: &str, data: Value) -> Result<Self> {
        expect_kind("t1", kind, data)
    }

    fn fullname(&self) -> Fullname {
        self.name.clone()
    }
}
