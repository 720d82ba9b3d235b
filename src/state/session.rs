//! Render session: the state one paginated list owns for its lifetime.
//!
//! The session is synchronous. Asynchronous work is split into a `begin_*`
//! call that hands out a request carrying the current epoch and a
//! `complete_*` call that applies the result only if the epoch still matches.
//! The async shell in `crate::integration` drives those pairs; tests drive them
//! directly to interleave completions in any order.

use crate::model::{Epoch, ListError, ListItem, MarkerId};
use crate::view_state::{EntryTable, ItemViewFactory, RenderedEntry, RenderedSequence};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, warn};

/// Construction-time settings of a render session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    page_size: usize,
    auto_refresh: Option<Duration>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            auto_refresh: None,
        }
    }
}

impl ListConfig {
    /// Page size used when none is configured.
    pub const DEFAULT_PAGE_SIZE: usize = 50;

    /// Default settings: 50 items per page, no auto-refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    ///
    /// # Errors
    ///
    /// Returns `ListError::ZeroPageSize` for 0.
    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, ListError> {
        if page_size == 0 {
            return Err(ListError::ZeroPageSize);
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Enable auto-refresh every `interval`. A zero interval disables it.
    pub fn with_auto_refresh(mut self, interval: Duration) -> Self {
        self.auto_refresh = (!interval.is_zero()).then_some(interval);
        self
    }

    /// Items requested per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Auto-refresh interval, if enabled.
    pub fn auto_refresh(&self) -> Option<Duration> {
        self.auto_refresh
    }
}

/// State of one paginated list: entries, flags, epoch and the view factory.
///
/// Dropping a session reclaims every live view.
pub struct ListSession<T, V>
where
    V: ItemViewFactory<T>,
{
    pub(super) config: ListConfig,
    pub(super) factory: V,
    pub(super) epoch: Epoch,
    pub(super) current_page: usize,
    pub(super) filter: Option<String>,
    pub(super) loading: bool,
    pub(super) refreshing: bool,
    pub(super) trigger: bool,
    pub(super) torn_down: bool,
    pub(super) generation: u64,
    pub(super) prepended_fragments: u64,
    pub(super) sequence: RenderedSequence<V::Fragment>,
    pub(super) entries: EntryTable<V::Handle>,
    _item: PhantomData<fn(&T)>,
}

impl<T, V> ListSession<T, V>
where
    V: ItemViewFactory<T>,
{
    /// Fresh session with an empty rendered sequence and an active trigger.
    pub fn new(config: ListConfig, factory: V) -> Self {
        debug!(
            page_size = config.page_size(),
            auto_refresh = ?config.auto_refresh(),
            "list session created"
        );
        Self {
            config,
            factory,
            epoch: Epoch::initial(),
            current_page: 0,
            filter: None,
            loading: false,
            refreshing: false,
            trigger: true,
            torn_down: false,
            generation: 0,
            prepended_fragments: 0,
            sequence: RenderedSequence::new(),
            entries: EntryTable::new(),
            _item: PhantomData,
        }
    }

    /// Reclaim every view and invalidate all in-flight work for good.
    ///
    /// Idempotent. After teardown the session renders nothing and ignores
    /// every further request.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.epoch.advance();
        self.loading = false;
        self.refreshing = false;
        self.trigger = false;
        self.release_entries();
        self.torn_down = true;
        self.generation += 1;
        debug!(epoch = %self.epoch, "list session torn down");
    }

    pub(super) fn release_entries(&mut self) {
        for entry in self.entries.drain() {
            if let Some(handle) = entry.handle {
                self.factory.reclaim(handle);
            }
        }
        self.sequence.clear();
    }

    // ===== Observers =====

    /// Settings the session was built with.
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Items requested per page.
    pub fn page_size(&self) -> usize {
        self.config.page_size()
    }

    /// Auto-refresh interval, if any.
    pub fn auto_refresh(&self) -> Option<Duration> {
        self.config.auto_refresh()
    }

    /// Current epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Pages fully loaded since the last hard reset.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Filter in effect; `None` until `set_filter` is first called.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// True while a page load is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while an auto-refresh fetch is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// True while the load-more sentinel is present.
    pub fn has_trigger(&self) -> bool {
        self.trigger
    }

    /// True once `teardown` has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Bumped on every change to the rendered output.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fragments inserted at the front by reconciliation since the last hard
    /// reset. Hosts use it to keep the scroll position anchored.
    pub fn prepended_fragments(&self) -> u64 {
        self.prepended_fragments
    }

    /// Number of rendered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry keys in display order.
    pub fn keys(&self) -> Vec<&str> {
        self.sequence
            .begin_markers()
            .filter_map(|marker| self.entries.get_by_begin(marker))
            .map(|entry| entry.key.as_str())
            .collect()
    }

    /// Entry indexed under `key`.
    pub fn entry(&self, key: &str) -> Option<&RenderedEntry<V::Handle>> {
        self.entries.get_by_key(key)
    }

    /// Output fragments of the entry indexed under `key`.
    pub fn entry_fragments(&self, key: &str) -> Option<Vec<&V::Fragment>> {
        let entry = self.entries.get_by_key(key)?;
        self.sequence.fragments_between(entry.begin, entry.end)
    }

    /// All fragments in display order.
    pub fn fragments(&self) -> impl Iterator<Item = &V::Fragment> + '_ {
        self.sequence.fragments()
    }

    /// Number of fragments currently rendered.
    pub fn fragment_count(&self) -> usize {
        self.sequence.fragment_count()
    }

    /// The marker-bounded sequence itself.
    pub fn sequence(&self) -> &RenderedSequence<V::Fragment> {
        &self.sequence
    }

    /// The view factory, for hosts that query it (e.g. live view counts).
    pub fn factory(&self) -> &V {
        &self.factory
    }
}

impl<T, V> ListSession<T, V>
where
    T: ListItem,
    V: ItemViewFactory<T>,
{
    /// Key and hash of `item`, falling back to empty strings.
    ///
    /// With auto-refresh active a missing value is an integration bug: it is
    /// logged and the item is still rendered.
    pub(super) fn identity_of(&self, item: &T) -> (String, String) {
        let key = item.key().filter(|k| !k.is_empty());
        let hash = item.content_hash().filter(|h| !h.is_empty());
        if self.config.auto_refresh().is_some() && (key.is_none() || hash.is_none()) {
            warn!(
                key = key.unwrap_or_default(),
                has_key = key.is_some(),
                has_hash = hash.is_some(),
                "item missing unique key or content hash while auto-refresh is active"
            );
        }
        (
            key.unwrap_or_default().to_string(),
            hash.unwrap_or_default().to_string(),
        )
    }

    /// Build output for a first sighting. A factory failure renders the entry empty.
    pub(super) fn build_view(
        &mut self,
        item: &T,
        key: &str,
    ) -> (Vec<V::Fragment>, Option<V::Handle>) {
        match self.factory.create_view(item) {
            Ok(view) => (view.output, Some(view.handle)),
            Err(err) => {
                warn!(key, error = %err, "view factory failed; entry rendered empty");
                (Vec::new(), None)
            }
        }
    }

    pub(super) fn register(
        &mut self,
        key: String,
        hash: String,
        begin: MarkerId,
        end: MarkerId,
        handle: Option<V::Handle>,
    ) {
        if self.config.auto_refresh().is_some() && self.entries.contains_key(&key) {
            warn!(key = %key, "unique key rendered twice; refresh tracks the first sighting only");
        }
        self.entries.insert(RenderedEntry {
            key,
            begin,
            end,
            handle,
            hash,
        });
    }
}

impl<T, V> Drop for ListSession<T, V>
where
    V: ItemViewFactory<T>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
