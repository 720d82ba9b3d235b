//! Visibility gate boundary: tells a list when its load sentinel is on screen.

use crate::model::{SubscriptionId, TriggerRef};

/// Callback invoked when the subscribed trigger becomes visible.
pub type VisibilityCallback = Box<dyn Fn()>;

/// Source of "the load-more sentinel became visible" signals.
///
/// Methods take `&self` so a gate can be shared (`Rc`) between the host, which
/// feeds it layout information, and the lists subscribed to it. The gate may
/// fire while a page is already loading or after the list is exhausted; the
/// list suppresses those signals itself.
pub trait VisibilityGate {
    /// Start delivering visibility signals for `trigger` to `callback`.
    fn subscribe(&self, trigger: TriggerRef, callback: VisibilityCallback) -> SubscriptionId;

    /// Stop delivering signals for `subscription`. Unknown ids are ignored.
    fn unsubscribe(&self, subscription: SubscriptionId);
}
