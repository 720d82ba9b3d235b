//! Auto-refresh: re-fetch the displayed window and patch rendered entries.
//!
//! Reconciliation is additive and corrective. Entries whose hash changed get
//! a new view spliced between their existing markers, unseen keys are inserted
//! at the front, and entries missing from the response are left alone.

use super::session::ListSession;
use crate::model::{Epoch, FetchError, Items, ListError, ListItem, MarkerId};
use crate::view_state::ItemViewFactory;
use tracing::{debug, error, trace};

/// An auto-refresh fetch handed out by [`ListSession::begin_refresh`].
///
/// Always covers `offset 0 .. count`, unfiltered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    epoch: Epoch,
    count: usize,
}

impl RefreshRequest {
    /// Epoch captured when the request was issued.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Size of the displayed window to re-fetch from offset 0.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Items whose key and hash matched a rendered entry.
    pub unchanged: usize,
    /// Entries whose view was replaced in place.
    pub replaced: usize,
    /// Unseen keys inserted at the front.
    pub inserted: usize,
    /// Changed items whose new view could not be built; the old view stays.
    pub failed: usize,
}

impl ReconcileStats {
    /// True when the pass changed nothing on screen.
    pub fn is_noop(&self) -> bool {
        self.replaced == 0 && self.inserted == 0
    }
}

/// What a completed auto-refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response was reconciled into the rendered entries.
    Reconciled(ReconcileStats),
    /// The session was reset since the request; result dropped.
    Stale,
    /// The provider failed; the error is swallowed and the next tick retries.
    Swallowed,
}

impl<T, V> ListSession<T, V>
where
    V: ItemViewFactory<T>,
{
    /// Issue an auto-refresh of the displayed window.
    ///
    /// Returns `Ok(None)` when a page load or another refresh is outstanding,
    /// or when nothing has been loaded yet (the window would be empty).
    ///
    /// # Errors
    ///
    /// - `ListError::AutoRefreshNotConfigured` when the session has no interval.
    /// - `ListError::TornDown` after teardown.
    pub fn begin_refresh(&mut self) -> Result<Option<RefreshRequest>, ListError> {
        if self.config.auto_refresh().is_none() {
            return Err(ListError::AutoRefreshNotConfigured);
        }
        if self.torn_down {
            return Err(ListError::TornDown);
        }
        if self.loading || self.refreshing {
            trace!(
                loading = self.loading,
                refreshing = self.refreshing,
                "auto-refresh skipped; work outstanding"
            );
            return Ok(None);
        }

        let count = self.current_page * self.config.page_size();
        if count == 0 {
            return Ok(None);
        }
        self.refreshing = true;
        Ok(Some(RefreshRequest {
            epoch: self.epoch,
            count,
        }))
    }
}

impl<T, V> ListSession<T, V>
where
    T: ListItem,
    V: ItemViewFactory<T>,
{
    /// Apply the result of an auto-refresh request.
    ///
    /// Failures never surface: they are swallowed and the next tick retries.
    /// Stale completions leave the flags alone; a newer refresh may be outstanding.
    pub fn complete_refresh(
        &mut self,
        request: RefreshRequest,
        result: Result<Items<T>, FetchError>,
    ) -> RefreshOutcome {
        if request.epoch != self.epoch {
            debug!(
                issued = %request.epoch,
                current = %self.epoch,
                "discarding stale auto-refresh"
            );
            return RefreshOutcome::Stale;
        }
        self.refreshing = false;

        match result {
            Ok(page) => RefreshOutcome::Reconciled(self.reconcile(page.items)),
            Err(err) => {
                trace!(error = %err, "auto-refresh failed; waiting for next tick");
                RefreshOutcome::Swallowed
            }
        }
    }

    /// Patch rendered entries to match `items`.
    ///
    /// Items are walked last to first so that consecutive front insertions end
    /// up in provider order at the head of the list.
    pub fn reconcile(&mut self, items: Vec<T>) -> ReconcileStats {
        let mut stats = ReconcileStats::default();

        for item in items.iter().rev() {
            let (key, hash) = self.identity_of(item);
            let existing = self
                .entries
                .get_by_key(&key)
                .map(|entry| (entry.begin, entry.end, entry.hash == hash));

            match existing {
                Some((_, _, true)) => stats.unchanged += 1,
                Some((begin, end, false)) => {
                    if self.replace_in_place(item, &key, hash, begin, end) {
                        stats.replaced += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
                None => {
                    self.insert_front(item, key, hash);
                    stats.inserted += 1;
                }
            }
        }

        if !stats.is_noop() {
            self.generation += 1;
        }
        debug!(
            unchanged = stats.unchanged,
            replaced = stats.replaced,
            inserted = stats.inserted,
            failed = stats.failed,
            "reconciled"
        );
        stats
    }

    fn replace_in_place(
        &mut self,
        item: &T,
        key: &str,
        hash: String,
        begin: MarkerId,
        end: MarkerId,
    ) -> bool {
        let view = match self.factory.create_view(item) {
            Ok(view) => view,
            Err(err) => {
                trace!(key, error = %err, "replacement view failed; keeping previous view");
                return false;
            }
        };

        if let Err(err) = self.sequence.splice(begin, end, view.output) {
            error!(key, error = %err, "rendered entry lost its markers");
            self.factory.reclaim(view.handle);
            return false;
        }

        if let Some(entry) = self.entries.get_by_key_mut(key) {
            if let Some(previous) = entry.handle.replace(view.handle) {
                self.factory.reclaim(previous);
            }
            entry.hash = hash;
        }
        true
    }

    fn insert_front(&mut self, item: &T, key: String, hash: String) {
        let (output, handle) = self.build_view(item, &key);
        self.prepended_fragments += output.len() as u64;
        let (begin, end) = self.sequence.push_front(output);
        self.register(key, hash, begin, end, handle);
    }
}
