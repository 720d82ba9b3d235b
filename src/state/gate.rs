//! Epoch-based invalidation: hard reset and graceful refresh.

use super::reconcile::RefreshRequest;
use super::session::ListSession;
use crate::model::ListError;
use crate::view_state::ItemViewFactory;
use tracing::{debug, error};

impl<T, V> ListSession<T, V>
where
    V: ItemViewFactory<T>,
{
    /// Reset the list.
    ///
    /// `graceful == false` is a hard reset (see [`ListSession::hard_reset`]) and
    /// returns `Ok(None)`. `graceful == true` keeps everything rendered and
    /// issues an out-of-cadence auto-refresh, returned as the request to run
    /// (`None` when skipped because other work is outstanding).
    ///
    /// # Errors
    ///
    /// - `ListError::AutoRefreshNotConfigured` for a graceful reset on a list
    ///   without auto-refresh. This is a caller bug and is also logged.
    /// - `ListError::TornDown` after teardown.
    pub fn reset(&mut self, graceful: bool) -> Result<Option<RefreshRequest>, ListError> {
        if graceful {
            return self.begin_refresh().inspect_err(|err| {
                error!(error = %err, "graceful reset rejected");
            });
        }
        if self.torn_down {
            return Err(ListError::TornDown);
        }
        self.hard_reset();
        Ok(None)
    }

    /// Invalidate in-flight work and start over from page zero.
    ///
    /// Advances the epoch, clears both in-flight flags, reclaims every view,
    /// and restores the load trigger.
    pub fn hard_reset(&mut self) {
        if self.torn_down {
            return;
        }
        self.epoch.advance();
        self.loading = false;
        self.refreshing = false;
        self.release_entries();
        self.current_page = 0;
        self.trigger = true;
        self.prepended_fragments = 0;
        self.generation += 1;
        debug!(epoch = %self.epoch, "hard reset");
    }

    /// Change the page size. Takes effect through a hard reset.
    ///
    /// # Errors
    ///
    /// Returns `ListError::ZeroPageSize` for 0 and `ListError::TornDown` after teardown.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ListError> {
        if self.torn_down {
            return Err(ListError::TornDown);
        }
        if page_size == self.config.page_size() {
            return Ok(());
        }
        self.config = self.config.with_page_size(page_size)?;
        self.hard_reset();
        Ok(())
    }
}
