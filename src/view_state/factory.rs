//! View factory boundary: turns one item into output fragments.

use crate::model::ViewError;

/// Output of one `create_view` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView<F, H> {
    /// Zero or more fragments, in display order.
    pub output: Vec<F>,
    /// Handle the core must hand back to [`ItemViewFactory::reclaim`].
    pub handle: H,
}

impl<F, H> ItemView<F, H> {
    /// Bundle output with its handle.
    pub fn new(output: Vec<F>, handle: H) -> Self {
        Self { output, handle }
    }
}

/// Builds and reclaims the visible output of items of type `T`.
///
/// Every handle returned by `create_view` is reclaimed exactly once by the
/// list session: when the item's view is replaced, on hard reset, or on
/// teardown.
pub trait ItemViewFactory<T> {
    /// One unit of output (a line, a widget, a DOM node...).
    type Fragment;
    /// Resource token for a live view.
    type Handle;

    /// Build the output for `item`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` when the item cannot be rendered; the session maps it
    /// and never propagates it.
    fn create_view(
        &mut self,
        item: &T,
    ) -> Result<ItemView<Self::Fragment, Self::Handle>, ViewError>;

    /// Release a view previously returned by `create_view`.
    fn reclaim(&mut self, handle: Self::Handle);
}
