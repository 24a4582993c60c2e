//! The `{kind, data}` envelope Reddit wraps every object in.
//!
//! [`Listable`] is the seam between raw listing JSON and the typed models:
//! listings and streams are generic over it, and it is the only thing they
//! need from an item (construction plus identity).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Comment, Fullname, Redditor, Submission, Subreddit};
use crate::{Error, Result};

/// An item that can appear in a listing.
pub trait Listable: Sized + Send + Unpin + 'static {
    /// Build the item from a thing's `kind` and `data`.
    fn from_thing(kind: &str, data: Value) -> Result<Self>;

    /// The identity of the item.
    fn fullname(&self) -> Fullname;
}

/// Raw thing envelope as it appears in listing children.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawThing {
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// Any object a mixed listing or `info` lookup can return.
#[derive(Debug, Clone)]
pub enum Thing {
    /// `t1`
    Comment(Comment),
    /// `t2`
    Redditor(Redditor),
    /// `t3`
    Submission(Submission),
    /// `t5`
    Subreddit(Subreddit),
    /// Any kind this crate does not model
    Other {
        /// The wire kind
        kind: String,
        /// The untouched payload
        data: Value,
    },
}

impl Listable for Thing {
    fn from_thing(kind: &str, data: Value) -> Result<Self> {
        Ok(match kind {
            "t1" => Thing::Comment(Comment::from_thing(kind, data)?),
            "t2" => Thing::Redditor(Redditor::from_thing(kind, data)?),
            "t3" => Thing::Submission(Submission::from_thing(kind, data)?),
            "t5" => Thing::Subreddit(Subreddit::from_thing(kind, data)?),
            _ => Thing::Other {
                kind: kind.to_string(),
                data,
            },
        })
    }

    fn fullname(&self) -> Fullname {
        match self {
            Thing::Comment(c) => c.fullname(),
            Thing::Redditor(r) => r.fullname(),
            Thing::Submission(s) => s.fullname(),
            Thing::Subreddit(s) => s.fullname(),
            Thing::Other { data, .. } => Fullname::from_api(
                data.get("name").and_then(Value::as_str).unwrap_or_default(),
            ),
        }
    }
}

/// Deserialize `data` for a fixed kind, rejecting mismatches.
pub(crate) fn expect_kind<T: serde::de::DeserializeOwned>(
    expected: &str,
    kind: &str,
    data: Value,
) -> Result<T> {
    if kind != expected {
        return Err(Error::InvalidInput(format!(
            "expected a {expected} thing, got {kind}"
        )));
    }
    Ok(serde_json::from_value(data)?)
}

/// Whether and when an object was edited.
///
/// Reddit sends `false` for never-edited objects and a timestamp otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Edited {
    /// Edit flag (always `false` in practice)
    Flag(bool),
    /// Edit time in seconds since the epoch
    At(f64),
}

impl Default for Edited {
    fn default() -> Self {
        Edited::Flag(false)
    }
}

impl Edited {
    /// Returns `true` if the object has been edited.
    pub fn is_edited(&self) -> bool {
        !matches!(self, Edited::Flag(false))
    }
}

pub(crate) fn timestamp(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs.trunc() as i64, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thing_dispatches_on_kind() {
        let data = json!({"id": "abc", "name": "t1_abc", "body": "hi", "created_utc": 1.0});
        let thing = Thing::from_thing("t1", data).unwrap();
        assert!(matches!(thing, Thing::Comment(_)));
        assert_eq!(thing.fullname().as_str(), "t1_abc");
    }

    #[test]
    fn test_unknown_kind_is_kept() {
        let thing = Thing::from_thing("t4", json!({"name": "t4_zz"})).unwrap();
        match &thing {
            Thing::Other { kind, .. } => assert_eq!(kind, "t4"),
            other => panic!("expected Other, got {other:?}"),
        }
        assert_eq!(thing.fullname().as_str(), "t4_zz");
    }

    #[test]
    fn test_edited_shapes() {
        let never: Edited = serde_json::from_value(json!(false)).unwrap();
        let at: Edited = serde_json::from_value(json!(1700000000.0)).unwrap();
        assert!(!never.is_edited());
        assert!(at.is_edited());
    }
}
