//! Incremental paginated list rendering with live reconciliation.
//!
//! A list fetches pages from an [`source::ItemsProvider`] when its load
//! sentinel becomes visible, renders each item through an
//! [`view_state::ItemViewFactory`], and (optionally) re-fetches the displayed
//! window on a timer, patching changed items in place and prepending new ones.
//!
//! The crate follows a Pure Core / Impure Shell split: [`state::ListSession`]
//! is a synchronous state machine; [`integration::PagedList`] drives it from
//! tokio local tasks; [`view`] hosts it in a ratatui terminal console.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;

// Async shell around the core
pub mod integration;

#[cfg(test)]
mod test_harness;
