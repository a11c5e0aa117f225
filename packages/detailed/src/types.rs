//! Core error types and definitions

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

use crate::capture::{Location, Stack};

/// Shared, thread-safe handle to any error value
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// An error decorated with call-site context, an optional cause and related errors
///
/// `Detailed` is a cheap handle: cloning it bumps a reference count. Builder
/// methods never touch the value they are called on; each returns a new
/// `Detailed` that shares the untouched parts with its predecessor, so a value
/// can be extended from several threads without coordination.
#[derive(Clone)]
pub struct Detailed {
    pub(crate) inner: Arc<DetailedInner>,
}

pub(crate) struct DetailedInner {
    /// Human annotation, rendered before the origin text
    pub annotation: Option<Arc<str>>,
    /// The decorated error
    pub origin: SharedError,
    /// The one antecedent error
    pub cause: Option<SharedError>,
    /// Sibling errors, in insertion order
    pub related: Arc<[SharedError]>,
    /// Where the decoration was created
    pub location: Location,
    /// Frames captured at construction, innermost first
    pub stack: Stack,
}

/// Plain message error used as the origin of [`Detailed::new`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{text}")]
pub struct Message {
    text: String,
}

impl Message {
    /// Create a message error
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }

    /// The message text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Result type alias using [`Detailed`]
pub type Result<T> = std::result::Result<T, Detailed>;
