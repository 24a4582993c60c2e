//! Two-state lazy objects.
//!
//! A handle starts as a stub holding only its identifier. Field access goes
//! through [`Lazy::get`], which fails with [`Error::NotLoaded`] until the
//! owning handle's `load()` has fetched the data. No field access ever
//! performs I/O on its own.

use crate::{Error, Result};

/// Either an unfetched stub or the loaded data.
#[derive(Debug, Clone, Default)]
pub enum Lazy<T> {
    /// Only the identifier is known
    #[default]
    Stub,
    /// The object has been fetched
    Loaded(T),
}

impl<T> Lazy<T> {
    /// Returns `true` once the data is present.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Lazy::Loaded(_))
    }

    /// Borrow the data, failing for stubs.
    pub fn get(&self, kind: &'static str, id: &str) -> Result<&T> {
        match self {
            Lazy::Loaded(data) => Ok(data),
            Lazy::Stub => Err(Error::NotLoaded {
                kind,
                id: id.to_string(),
            }),
        }
    }

    /// Replace the contents with freshly loaded data.
    pub fn set(&mut self, data: T) {
        *self = Lazy::Loaded(data);
    }

    /// Take the data out, if loaded.
    pub fn into_inner(self) -> Option<T> {
        match self {
            Lazy::Loaded(data) => Some(data),
            Lazy::Stub => None,
        }
    }
}
