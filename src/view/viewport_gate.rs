//! Visibility gate driven by layout observations.

use crate::model::{SubscriptionId, TriggerRef};
use crate::view_state::{VisibilityCallback, VisibilityGate};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::trace;

struct Subscription {
    trigger: TriggerRef,
    callback: Rc<dyn Fn()>,
}

#[derive(Default)]
struct GateState {
    next_id: u64,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    /// Last reported visibility per trigger. Absent means "not yet observed".
    visible: HashMap<TriggerRef, bool>,
}

/// Fires subscriptions when the host reports a trigger going from hidden to visible.
///
/// The host calls [`ViewportGate::observe`] after every layout pass. A
/// trigger that stays visible does not fire again until it is hidden, or
/// until [`ViewportGate::invalidate`] forgets the previous observation.
#[derive(Default)]
pub struct ViewportGate {
    state: RefCell<GateState>,
}

impl ViewportGate {
    /// Empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report whether `trigger` is currently on screen.
    ///
    /// Returns the number of callbacks fired.
    pub fn observe(&self, trigger: TriggerRef, visible: bool) -> usize {
        let callbacks: Vec<Rc<dyn Fn()>> = {
            let mut state = self.state.borrow_mut();
            let was_visible = state.visible.insert(trigger, visible).unwrap_or(false);
            if !visible || was_visible {
                return 0;
            }
            state
                .subscriptions
                .values()
                .filter(|sub| sub.trigger == trigger)
                .map(|sub| Rc::clone(&sub.callback))
                .collect()
        };

        trace!(%trigger, subscribers = callbacks.len(), "trigger became visible");
        // Callbacks may subscribe, unsubscribe or observe; the borrow is released.
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Forget the last observation of `trigger`, so the next visible report fires.
    pub fn invalidate(&self, trigger: TriggerRef) {
        self.state.borrow_mut().visible.remove(&trigger);
    }

    /// Number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }
}

impl VisibilityGate for ViewportGate {
    fn subscribe(&self, trigger: TriggerRef, callback: VisibilityCallback) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId::new(state.next_id);
        state.next_id += 1;
        state.subscriptions.insert(
            id,
            Subscription {
                trigger,
                callback: Rc::from(callback),
            },
        );
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.state.borrow_mut().subscriptions.remove(&subscription);
    }
}
