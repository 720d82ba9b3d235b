//! Item providers.
//!
//! This module provides the data-fetching boundary of a list:
//! - [`ItemsProvider`], the async page-fetch trait the list consumes
//! - [`MemoryProvider`] for in-memory collections (tests, fixtures)
//! - [`JsonlFileProvider`] for JSON Lines files re-read on every fetch

use crate::model::{FetchError, Items, ListItem};
use async_trait::async_trait;

pub mod file;
pub mod memory;

pub use file::JsonlFileProvider;
pub use memory::{MemoryProvider, ProviderCall};

/// Supplies page windows of items, optionally filtered.
///
/// Providers must return a stable ordering for identical `(offset, count)`
/// absent underlying changes, and signal end-of-data by returning fewer than
/// `count` items. Calls are single-threaded; futures need not be `Send`.
#[async_trait(?Send)]
pub trait ItemsProvider {
    /// Item type produced by this provider.
    type Item: ListItem;

    /// Fetch `count` items starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the window cannot be produced.
    async fn fetch_items(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Items<Self::Item>, FetchError>;

    /// Fetch `count` items matching `filter`, starting at `offset` within the
    /// filtered collection.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the window cannot be produced.
    async fn fetch_filtered_items(
        &self,
        filter: &str,
        offset: usize,
        count: usize,
    ) -> Result<Items<Self::Item>, FetchError>;
}
