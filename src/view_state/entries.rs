//! Table of rendered entries, indexed by key and by begin marker.

use crate::model::{EntryId, MarkerId};
use std::collections::HashMap;

/// Binding between an item key and its currently visible output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry<H> {
    /// Unique key of the item (empty when the item carried none).
    pub key: String,
    /// Opening marker of the item's output.
    pub begin: MarkerId,
    /// Closing marker of the item's output.
    pub end: MarkerId,
    /// View handle to reclaim; `None` when the factory failed to build a view.
    pub handle: Option<H>,
    /// Content hash the current view was built from.
    pub hash: String,
}

/// Arena of rendered entries.
///
/// The key index keeps the first entry registered for a key. Later entries
/// with the same key are still stored (so their views are reclaimed on reset)
/// but the reconciler only ever targets the indexed one.
#[derive(Debug)]
pub struct EntryTable<H> {
    entries: HashMap<EntryId, RenderedEntry<H>>,
    by_key: HashMap<String, EntryId>,
    by_begin: HashMap<MarkerId, EntryId>,
    next_id: u64,
}

impl<H> Default for EntryTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> EntryTable<H> {
    /// Empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            by_key: HashMap::new(),
            by_begin: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register an entry.
    ///
    /// Returns the new id and whether the key was already indexed by an
    /// earlier entry.
    pub fn insert(&mut self, entry: RenderedEntry<H>) -> (EntryId, bool) {
        let id = EntryId::from_raw(self.next_id);
        self.next_id += 1;

        let duplicate = self.by_key.contains_key(&entry.key);
        if !duplicate {
            self.by_key.insert(entry.key.clone(), id);
        }
        self.by_begin.insert(entry.begin, id);
        self.entries.insert(id, entry);
        (id, duplicate)
    }

    /// Entry indexed under `key`.
    pub fn get_by_key(&self, key: &str) -> Option<&RenderedEntry<H>> {
        self.by_key.get(key).and_then(|id| self.entries.get(id))
    }

    /// Mutable entry indexed under `key`.
    pub fn get_by_key_mut(&mut self, key: &str) -> Option<&mut RenderedEntry<H>> {
        let id = self.by_key.get(key)?;
        self.entries.get_mut(id)
    }

    /// Entry whose output opens with `begin`.
    pub fn get_by_begin(&self, begin: MarkerId) -> Option<&RenderedEntry<H>> {
        self.by_begin.get(&begin).and_then(|id| self.entries.get(id))
    }

    /// True when some entry is indexed under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry. Order is unspecified.
    pub fn drain(&mut self) -> Vec<RenderedEntry<H>> {
        self.by_key.clear();
        self.by_begin.clear();
        self.entries.drain().map(|(_, entry)| entry).collect()
    }
}
