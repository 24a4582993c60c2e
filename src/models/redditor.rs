//! Redditor (account) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::thing::{expect_kind, timestamp, Listable};
use super::{Fullname, Kind};
use crate::Result;

/// A user account.
///
/// Unlike other things, a redditor's `name` is the username; the fullname
/// is derived from the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redditor {
    /// Base-36 id
    pub id: String,
    /// Username
    pub name: String,
    /// Creation time in seconds since the epoch
    #[serde(default)]
    pub created_utc: f64,
    /// Karma from links
    #[serde(default)]
    pub link_karma: i64,
    /// Karma from comments
    #[serde(default)]
    pub comment_karma: i64,
    /// Whether the account moderates any subreddit
    #[serde(default)]
    pub is_mod: bool,
    /// Whether the account has a verified email
    #[serde(default)]
    pub has_verified_email: Option<bool>,
    /// Whether the account is suspended
    #[serde(default)]
    pub is_suspended: bool,
}

impl Redditor {
    /// Creation time.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        timestamp(self.created_utc)
    }
}

impl Listable for Redditor {
    fn from_thing(kind: &str, data: Value) -> Result<Self> {
        expect_kind("t2", kind, data)
    }

    fn fullname(&self) -> Fullname {
        Fullname::new(Kind::Account, &self.id)
    }
}
