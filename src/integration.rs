//! Async shell around the list session.
//!
//! [`PagedList`] wires a [`ListSession`] to its collaborators: provider calls
//! run as local tasks, the auto-refresh timer is a local task, and the
//! visibility gate subscription triggers page loads. Everything runs on one
//! thread inside a `tokio::task::LocalSet`; the session's epoch check is the
//! only protection against completions that arrive after a reset.

use crate::model::{FetchError, ListError, SubscriptionId, TriggerRef};
use crate::source::ItemsProvider;
use crate::state::{ListConfig, ListSession, LoadOutcome, RefreshOutcome};
use crate::view_state::{ItemViewFactory, VisibilityGate};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

/// Host callback for page-load failures.
pub type LoadErrorSink = Box<dyn FnMut(&FetchError)>;

struct Shared<P, V>
where
    P: ItemsProvider,
    V: ItemViewFactory<P::Item>,
{
    session: RefCell<ListSession<P::Item, V>>,
    provider: P,
    on_load_error: RefCell<Option<LoadErrorSink>>,
}

impl<P, V> Shared<P, V>
where
    P: ItemsProvider + 'static,
    P::Item: 'static,
    V: ItemViewFactory<P::Item> + 'static,
{
    fn load_next_page(self: &Rc<Self>) {
        let Some(request) = self.session.borrow_mut().begin_load() else {
            return;
        };

        let shared = Rc::clone(self);
        tokio::task::spawn_local(async move {
            let result = match request.filter() {
                Some(filter) => {
                    shared
                        .provider
                        .fetch_filtered_items(filter, request.offset(), request.count())
                        .await
                }
                None => {
                    shared
                        .provider
                        .fetch_items(request.offset(), request.count())
                        .await
                }
            };

            let outcome = shared.session.borrow_mut().complete_load(request, result);
            if let LoadOutcome::Failed(err) = outcome {
                shared.report_load_error(&err);
            }
        });
    }

    fn refresh(self: &Rc<Self>) -> Result<(), ListError> {
        let Some(request) = self.session.borrow_mut().begin_refresh()? else {
            return Ok(());
        };

        let shared = Rc::clone(self);
        tokio::task::spawn_local(async move {
            let result = shared.provider.fetch_items(0, request.count()).await;
            let outcome = shared.session.borrow_mut().complete_refresh(request, result);
            if let RefreshOutcome::Reconciled(stats) = outcome {
                if !stats.is_noop() {
                    debug!(?stats, "auto-refresh patched rendered entries");
                }
            }
        });
        Ok(())
    }

    fn report_load_error(&self, err: &FetchError) {
        if let Some(sink) = self.on_load_error.borrow_mut().as_mut() {
            sink(err);
        }
    }
}

/// A mounted paginated list.
///
/// Mounting subscribes to the visibility gate and starts the auto-refresh
/// timer (when configured). [`PagedList::teardown`], or dropping the list,
/// cancels the timer, unsubscribes from the gate and reclaims every view.
pub struct PagedList<P, V, G>
where
    P: ItemsProvider + 'static,
    P::Item: 'static,
    V: ItemViewFactory<P::Item> + 'static,
    G: VisibilityGate,
{
    shared: Rc<Shared<P, V>>,
    gate: Rc<G>,
    subscription: Option<SubscriptionId>,
    timer: Option<JoinHandle<()>>,
}

impl<P, V, G> PagedList<P, V, G>
where
    P: ItemsProvider + 'static,
    P::Item: 'static,
    V: ItemViewFactory<P::Item> + 'static,
    G: VisibilityGate,
{
    /// Mount a list: subscribe `trigger` on `gate` and start the refresh timer.
    ///
    /// # Panics
    ///
    /// Must be called from within a `tokio::task::LocalSet` when auto-refresh
    /// is configured, since the timer is spawned as a local task.
    pub fn mount(
        provider: P,
        factory: V,
        gate: Rc<G>,
        trigger: TriggerRef,
        config: ListConfig,
    ) -> Self {
        let shared = Rc::new(Shared {
            session: RefCell::new(ListSession::new(config, factory)),
            provider,
            on_load_error: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let subscription = gate.subscribe(
            trigger,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.load_next_page();
                }
            }),
        );

        let timer = config
            .auto_refresh()
            .map(|period| spawn_refresh_timer(Rc::downgrade(&shared), period));

        debug!(%trigger, subscription = subscription.value(), "list mounted");
        Self {
            shared,
            gate,
            subscription: Some(subscription),
            timer,
        }
    }

    /// Install the callback that receives page-load failures.
    ///
    /// Failures are not retried and not logged by the list; surfacing them is
    /// the host's job.
    pub fn on_load_error(&self, sink: impl FnMut(&FetchError) + 'static) {
        *self.shared.on_load_error.borrow_mut() = Some(Box::new(sink));
    }

    /// Request the next page, exactly as a visibility signal would.
    pub fn load_next_page(&self) {
        self.shared.load_next_page();
    }

    /// Reset the list.
    ///
    /// `graceful == false` discards everything and restarts from page zero.
    /// `graceful == true` re-fetches the displayed window and patches it in place.
    ///
    /// # Errors
    ///
    /// `ListError::AutoRefreshNotConfigured` for a graceful update on a list
    /// without auto-refresh; `ListError::TornDown` after teardown.
    pub fn trigger_update(&self, graceful: bool) -> Result<(), ListError> {
        if graceful {
            return self.shared.refresh().inspect_err(|err| {
                error!(error = %err, "graceful update rejected");
            });
        }
        self.shared.session.borrow_mut().reset(false).map(|_| ())
    }

    /// Change the filter. Returns whether the list was reset.
    pub fn set_filter(&self, value: &str) -> bool {
        self.shared.session.borrow_mut().set_filter(value)
    }

    /// Read the session (rendered entries, flags) without mutating it.
    pub fn with_session<R>(&self, f: impl FnOnce(&ListSession<P::Item, V>) -> R) -> R {
        f(&self.shared.session.borrow())
    }

    /// The provider this list fetches from.
    pub fn provider(&self) -> &P {
        &self.shared.provider
    }

    /// True while the refresh timer task is alive.
    pub fn has_refresh_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Tear the list down: cancel the timer, unsubscribe, reclaim every view.
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(subscription) = self.subscription.take() {
            self.gate.unsubscribe(subscription);
        }
        match self.shared.session.try_borrow_mut() {
            Ok(mut session) => session.teardown(),
            Err(_) => warn!("session busy during teardown; views reclaimed when it is dropped"),
        }
    }
}

impl<P, V, G> Drop for PagedList<P, V, G>
where
    P: ItemsProvider + 'static,
    P::Item: 'static,
    V: ItemViewFactory<P::Item> + 'static,
    G: VisibilityGate,
{
    fn drop(&mut self) {
        self.release();
    }
}

fn spawn_refresh_timer<P, V>(shared: Weak<Shared<P, V>>, period: Duration) -> JoinHandle<()>
where
    P: ItemsProvider + 'static,
    P::Item: 'static,
    V: ItemViewFactory<P::Item> + 'static,
{
    tokio::task::spawn_local(async move {
        let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            let Some(shared) = shared.upgrade() else {
                break;
            };
            if let Err(err) = shared.refresh() {
                debug!(error = %err, "refresh timer stopping");
                break;
            }
        }
    })
}
