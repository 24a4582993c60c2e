//! Data models for the Reddit API.
//!
//! - [`primitives`] - Fullnames, cursors and filters
//! - [`thing`] - The `{kind, data}` envelope and the [`Listable`] seam
//! - [`lazy`] - Stub/loaded state for lazily fetched handles
//! - [`submission`], [`comment`], [`subreddit`], [`redditor`] - Resource data

pub mod primitives;
pub mod thing;
pub mod lazy;
pub mod submission;
pub mod comment;
pub mod subreddit;
pub mod redditor;

pub use primitives::*;
pub use thing::{Edited, Listable, Thing};
pub use lazy::Lazy;
pub use submission::*;
pub use comment::*;
pub use subreddit::*;
pub use redditor::*;
