//! Resource handles and API services.
//!
//! Handles ([`SubredditHandle`], [`SubmissionHandle`], [`CommentHandle`],
//! [`RedditorHandle`]) start as stubs and are filled by an explicit
//! `load()`. Listing methods return [`ListingBuilder`](crate::listing::ListingBuilder)s
//! and never need the handle to be loaded.

mod actions;
mod front;
mod redditor;
mod submission;
mod subreddit;

pub use actions::{Editable, Replyable, Savable, Votable, VoteDirection};
pub use front::{FrontService, SubredditsService};
pub use redditor::RedditorHandle;
pub use submission::{CommentHandle, SubmissionHandle};
pub use subreddit::{SubredditHandle, SubredditStream};
