//! Error types and the diagnostic error channel.
//!
//! Every fallible operation returns a `Result` directly — that is the
//! primary and sufficient error-reporting mechanism. The thread-local slot
//! below additionally mirrors the most recent failure with source location,
//! for the rarer case where a caller wants to sample "what was the last
//! thing that went wrong here" independent of the `Result` it came back on.
//! A thread-local keeps this diagnostic convenience from becoming a
//! process-global mutable record shared across unrelated callers.

use std::cell::RefCell;
use std::fmt;

/// Failures that can arise from the red-black tree engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// The arena could not grow to hold a new node.
    AllocFailed,
    /// `delete`/`remove` was asked to remove a key that isn't present.
    KeyNotFound,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::AllocFailed => write!(f, "failed to allocate a new tree node"),
            TreeError::KeyNotFound => write!(f, "key not found"),
        }
    }
}

impl std::error::Error for TreeError {}

/// Failures surfaced by the [`crate::Map`] facade. Currently a direct
/// mirror of [`TreeError`] plus a "tree handle missing" case retained for
/// completeness, even though the facade's own API can't actually produce it
/// (there is always a tree once a `Map` exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MapError {
    AllocFailed,
    KeyNotFound,
    NullTree,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::AllocFailed => write!(f, "failed to allocate a new map entry"),
            MapError::KeyNotFound => write!(f, "key not found"),
            MapError::NullTree => write!(f, "map has no backing tree"),
        }
    }
}

impl std::error::Error for MapError {}

impl From<TreeError> for MapError {
    fn from(e: TreeError) -> Self {
        match e {
            TreeError::AllocFailed => MapError::AllocFailed,
            TreeError::KeyNotFound => MapError::KeyNotFound,
        }
    }
}

/// A sampled failure: its kind plus the source location that raised it.
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext {
    pub error: MapError,
    pub file: &'static str,
    pub line: u32,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.error, self.file, self.line)
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<ErrorContext>> = RefCell::new(None);
}

/// Record a failure on the thread-local error channel. Called from every
/// failing path in [`crate::Map`]; successful operations never touch this.
pub(crate) fn record(error: MapError, file: &'static str, line: u32) {
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = Some(ErrorContext { error, file, line });
    });
}

/// The most recently recorded failure on this thread, if any. Successful
/// operations do not clear it — callers must sample this immediately after
/// observing a failed `Result` if they want the location context, before a
/// later failure overwrites it.
pub fn last_error() -> Option<ErrorContext> {
    LAST_ERROR.with(|slot| *slot.borrow())
}

/// Record `$err` (a [`MapError`]) at the call site and return it unchanged,
/// for use in a `return Err(record_here!(e));`-style expression.
macro_rules! record_here {
    ($err:expr) => {{
        let e: $crate::error::MapError = $err;
        $crate::error::record(e, file!(), line!());
        e
    }};
}

pub(crate) use record_here;
