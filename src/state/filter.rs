//! Filter changes restart pagination from the first page.

use super::session::ListSession;
use crate::view_state::ItemViewFactory;
use tracing::debug;

impl<T, V> ListSession<T, V>
where
    V: ItemViewFactory<T>,
{
    /// Store a new filter, hard-resetting the list if it changed.
    ///
    /// An unset filter and the empty string are different values: the first
    /// `set_filter("")` resets. A non-empty filter switches page loads to the
    /// provider's filtered fetch. Returns whether a reset happened.
    pub fn set_filter(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.torn_down || self.filter.as_deref() == Some(value.as_str()) {
            return false;
        }
        debug!(from = ?self.filter, to = %value, "filter changed");
        self.filter = Some(value);
        self.hard_reset();
        true
    }
}
