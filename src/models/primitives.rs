//! Primitive types and newtypes for type-safe API interactions.
//!
//! Reddit identifies every object by a "fullname": a type prefix such as
//! `t3` joined to a base-36 id by an underscore. These wrappers keep
//! fullnames, bare ids and pagination cursors from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// The type prefix of a fullname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `t1`
    Comment,
    /// `t2`
    Account,
    /// `t3`
    Link,
    /// `t4`
    Message,
    /// `t5`
    Subreddit,
    /// `t6`
    Award,
}

impl Kind {
    /// The wire prefix of this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            Kind::Comment => "t1",
            Kind::Account => "t2",
            Kind::Link => "t3",
            Kind::Message => "t4",
            Kind::Subreddit => "t5",
            Kind::Award => "t6",
        }
    }

    /// Look up a kind by its wire prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "t1" => Some(Kind::Comment),
            "t2" => Some(Kind::Account),
            "t3" => Some(Kind::Link),
            "t4" => Some(Kind::Message),
            "t5" => Some(Kind::Subreddit),
            "t6" => Some(Kind::Award),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A globally unique Reddit identifier such as `t3_15bfi0`.
///
/// # Example
///
/// ```
/// use reddit_rs::{Fullname, Kind};
///
/// let name = Fullname::new(Kind::Link, "15bfi0");
/// assert_eq!(name.as_str(), "t3_15bfi0");
/// assert_eq!(name.kind(), Some(Kind::Link));
/// assert_eq!(name.id(), "15bfi0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fullname(String);

impl Fullname {
    /// Build a fullname from a kind and a bare id.
    pub fn new(kind: Kind, id: impl AsRef<str>) -> Self {
        Self(format!("{}_{}", kind.prefix(), id.as_ref()))
    }

    /// Parse and validate a fullname string.
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        match s.split_once('_') {
            Some((prefix, id)) if Kind::from_prefix(prefix).is_some() && !id.is_empty() => {
                Ok(Self(s))
            }
            _ => Err(Error::InvalidInput(format!("not a fullname: {s:?}"))),
        }
    }

    /// Wrap a string the API handed us without validating it.
    pub(crate) fn from_api(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The kind encoded in the prefix, if recognised.
    pub fn kind(&self) -> Option<Kind> {
        self.0.split_once('_').and_then(|(p, _)| Kind::from_prefix(p))
    }

    /// The bare id without the prefix.
    pub fn id(&self) -> &str {
        self.0.split_once('_').map(|(_, id)| id).unwrap_or(&self.0)
    }

    /// Get the fullname as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fullname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Fullname {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An opaque pagination token: the fullname of the last item of a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Create a cursor from a raw token.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the cursor as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Fullname> for Cursor {
    fn from(name: Fullname) -> Self {
        Self(name.0)
    }
}

impl From<&Fullname> for Cursor {
    fn from(name: &Fullname) -> Self {
        Self(name.0.clone())
    }
}

impl From<&str> for Cursor {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Time window for `top` and `controversial` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    /// Past hour
    Hour,
    /// Past day
    Day,
    /// Past week
    Week,
    /// Past month
    Month,
    /// Past year
    Year,
    /// All time
    #[default]
    All,
}

impl TimeFilter {
    /// The query value for the `t` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl FromStr for TimeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hour" => Ok(TimeFilter::Hour),
            "day" => Ok(TimeFilter::Day),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            "year" => Ok(TimeFilter::Year),
            "all" => Ok(TimeFilter::All),
            other => Err(Error::InvalidInput(format!(
                "time filter must be one of: all, day, hour, month, week, year (got {other:?})"
            ))),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
