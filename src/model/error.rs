//! Error types for the list renderer.
//!
//! The taxonomy follows where a failure may surface:
//!
//! - [`FetchError`] - provider failures. A page-load failure clears the loading
//!   flag and is handed to the host; an auto-refresh failure is swallowed.
//! - [`ViewError`] - view factory failures. Never escape the core; the entry is
//!   rendered empty (page load) or keeps its previous view (refresh).
//! - [`ListError`] - caller contract violations on the control surface. These
//!   are returned, never swallowed.
//!
//! Missing key/hash while auto-refresh is active is not an error value: the core
//! logs it with `tracing::warn!` and falls back to an empty key/hash.

use std::path::PathBuf;
use thiserror::Error;

/// Provider failure while fetching a page window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The transport could not complete the request.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backing file could not be read.
    #[error("failed to read {path}: {reason}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error text.
        reason: String,
    },

    /// The response could not be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// View factory failure while building one item's output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The factory could not build a view for the item.
    #[error("failed to build view for {key:?}: {reason}")]
    Build {
        /// Key of the item, when known.
        key: Option<String>,
        /// Why the view could not be built.
        reason: String,
    },
}

/// Misuse of a list session's control surface.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// A graceful refresh was requested on a list without an auto-refresh interval.
    #[error("graceful refresh requested but auto-refresh is not configured for this list")]
    AutoRefreshNotConfigured,

    /// The session has already been torn down.
    #[error("list session has been torn down")]
    TornDown,

    /// Page size must be positive.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}
