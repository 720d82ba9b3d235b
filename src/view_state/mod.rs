//! Rendered state of a list and the boundaries it is rendered through.
//!
//! - [`RenderedSequence`] holds output fragments bounded by marker pairs
//! - [`EntryTable`] maps item keys to their marker pair, view handle and hash
//! - [`ItemViewFactory`] and [`VisibilityGate`] are the rendering-side collaborators

pub mod entries;
pub mod factory;
pub mod sequence;
pub mod visibility;

pub use entries::{EntryTable, RenderedEntry};
pub use factory::{ItemView, ItemViewFactory};
pub use sequence::{Node, RenderedSequence, SequenceError};
pub use visibility::{VisibilityCallback, VisibilityGate};
