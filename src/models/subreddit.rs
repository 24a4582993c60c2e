//! Subreddit models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::thing::{expect_kind, timestamp, Listable};
use super::Fullname;
use crate::Result;

/// A community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subreddit {
    /// Base-36 id
    pub id: String,
    /// Fullname (`t5_...`)
    pub name: Fullname,
    /// Name without the `r/` prefix
    pub display_name: String,
    /// Title shown in the header
    #[serde(default)]
    pub title: String,
    /// Short sidebar description
    #[serde(default)]
    pub public_description: String,
    /// Subscriber count
    #[serde(default)]
    pub subscribers: Option<u64>,
    /// Creation time in seconds since the epoch
    #[serde(default)]
    pub created_utc: f64,
    /// NSFW flag
    #[serde(default)]
    pub over18: bool,
    /// `public`, `private`, `restricted`, ...
    #[serde(default)]
    pub subreddit_type: Option<String>,
    /// Path such as `/r/rust/`
    #[serde(default)]
    pub url: String,
}

impl Subreddit {
    /// Creation time.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }
}

impl Listable for Subreddit {
    fn from_thing(kind: &str, data: Value) -> Result<Self> {
        expect_kind("t5", kind, data)
    }

    fn fullname(&self) -> Fullname {
        self.name.clone()
    }
}
