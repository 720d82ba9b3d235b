//! Page loading: request the next page and append it at the tail.

use super::session::ListSession;
use crate::model::{Epoch, FetchError, Items, ListItem};
use crate::view_state::ItemViewFactory;
use tracing::debug;

/// A page fetch handed out by [`ListSession::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    epoch: Epoch,
    offset: usize,
    count: usize,
    filter: Option<String>,
}

impl PageRequest {
    /// Epoch captured when the request was issued.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// First item to fetch.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of items to fetch.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Non-empty filter to fetch with; `None` means an unfiltered fetch.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

/// What a completed page load did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Items were appended at the tail.
    Appended {
        /// Number of items appended.
        count: usize,
    },
    /// The provider returned nothing; the trigger is removed until the next reset.
    Exhausted,
    /// The session was reset (or torn down) since the request; result dropped.
    Stale,
    /// The provider failed. Loading is cleared and the trigger stays active.
    Failed(FetchError),
}

impl<T, V> ListSession<T, V>
where
    T: ListItem,
    V: ItemViewFactory<T>,
{
    /// Issue the next page request.
    ///
    /// Returns `None` when a load is already outstanding, the trigger has been
    /// removed, or the session is torn down. Concurrent calls therefore collapse
    /// into one outstanding request.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.torn_down || self.loading || !self.trigger {
            return None;
        }
        self.loading = true;

        let count = self.config.page_size();
        let request = PageRequest {
            epoch: self.epoch,
            offset: self.current_page * count,
            count,
            filter: self.filter.clone().filter(|f| !f.is_empty()),
        };
        debug!(
            offset = request.offset,
            count = request.count,
            filter = ?request.filter,
            epoch = %request.epoch,
            "page load issued"
        );
        Some(request)
    }

    /// Apply the result of a page request.
    ///
    /// Results issued under an older epoch are discarded without touching any
    /// state: the reset that advanced the epoch already cleared the flags, and a
    /// newer load may be outstanding.
    pub fn complete_load(
        &mut self,
        request: PageRequest,
        result: Result<Items<T>, FetchError>,
    ) -> LoadOutcome {
        if request.epoch != self.epoch {
            debug!(
                issued = %request.epoch,
                current = %self.epoch,
                "discarding stale page load"
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;

        let page = match result {
            Ok(page) => page,
            Err(err) => return LoadOutcome::Failed(err),
        };

        self.current_page += 1;
        if page.items.is_empty() {
            self.trigger = false;
            self.generation += 1;
            debug!(pages = self.current_page, "provider exhausted; trigger removed");
            return LoadOutcome::Exhausted;
        }

        let count = page.items.len();
        for item in &page.items {
            self.append(item);
        }
        self.generation += 1;
        LoadOutcome::Appended { count }
    }

    fn append(&mut self, item: &T) {
        let (key, hash) = self.identity_of(item);
        let (output, handle) = self.build_view(item, &key);
        let (begin, end) = self.sequence.push_back(output);
        self.register(key, hash, begin, end, handle);
    }
}
