//! Paginated listings and live streams.
//!
//! - [`ListingGenerator`] walks a cursor-paginated endpoint lazily.
//! - [`StreamGenerator`] polls the newest page of a listing forever and
//!   yields only items it has not seen before.
//! - [`BoundedSet`] is the fixed-capacity LRU set streams deduplicate with.

mod bounded;
mod generator;
mod stream;

pub use bounded::BoundedSet;
pub use generator::{BoxFuture, ListingBuilder, ListingGenerator, DEFAULT_LIMIT, DEFAULT_PAGE_SIZE};
pub use stream::{PollBackoff, StreamEvent, StreamGenerator, StreamOptions, StreamPoll};

use serde::Deserialize;
use serde_json::Value;

use crate::models::thing::RawThing;
use crate::models::{Cursor, Listable};
use crate::{Error, Result};

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when the listing is exhausted
    pub after: Option<Cursor>,
    /// Cursor for the previous page
    pub before: Option<Cursor>,
}

/// Parameters for fetching a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Fetch items strictly after this cursor; `None` starts from the top
    pub after: Option<Cursor>,
    /// Maximum number of items wanted
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    kind: String,
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    before: Option<String>,
    #[serde(default)]
    children: Vec<RawThing>,
}

impl<T: Listable> Page<T> {
    /// Parse a `Listing` envelope into typed items.
    ///
    /// Endpoints that answer with `[listing, listing]` (a submission page
    /// and its comments) are unwrapped to the second listing.
    pub fn from_listing(value: Value) -> Result<Self> {
        let value = match value {
            Value::Array(mut parts) if parts.len() == 2 => parts.remove(1),
            other => other,
        };
        let envelope: ListingEnvelope = serde_json::from_value(value)?;
        if envelope.kind != "Listing" {
            return Err(Error::InvalidInput(format!(
                "expected a Listing, got {}",
                envelope.kind
            )));
        }

        let items = envelope
            .data
            .children
            .into_iter()
            .map(|child| T::from_thing(&child.kind, child.data))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            items,
            after: envelope.data.after.filter(|a| !a.is_empty()).map(Cursor::new),
            before: envelope.data.before.filter(|b| !b.is_empty()).map(Cursor::new),
        })
    }
}

impl<T> Page<T> {
    /// Build a page by hand.
    pub fn new(items: Vec<T>, after: Option<Cursor>) -> Self {
        Self {
            items,
            after,
            before: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Thing;
    use serde_json::json;

    #[test]
    fn test_page_from_listing() {
        let value = json!({
            "kind": "Listing",
            "data": {
                "after": "t3_b",
                "before": null,
                "children": [
                    {"kind": "t3", "data": {"id": "a", "name": "t3_a", "title": "first"}},
                    {"kind": "t3", "data": {"id": "b", "name": "t3_b", "title": "second"}}
                ]
            }
        });

        let page: Page<crate::models::Submission> = Page::from_listing(value).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "first");
        assert_eq!(page.after, Some(Cursor::new("t3_b")));
        assert!(page.before.is_none());
    }

    #[test]
    fn test_page_rejects_non_listing() {
        let value = json!({"kind": "t3", "data": {}});
        assert!(Page::<Thing>::from_listing(value).is_err());
    }

    #[test]
    fn test_empty_after_means_exhausted() {
        let value = json!({"kind": "Listing", "data": {"after": "", "children": []}});
        let page: Page<Thing> = Page::from_listing(value).unwrap();
        assert!(page.after.is_none());
    }
}
