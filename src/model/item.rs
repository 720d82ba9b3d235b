//! Items and page windows exchanged with providers.

/// Identity of a list item as seen by the reconciler.
///
/// Both values are required whenever auto-refresh is configured. `key` must be
/// unique within a render session; `content_hash` must change iff anything the
/// view displays changes. Empty strings count as missing.
pub trait ListItem {
    /// Stable identifier correlating the same logical item across fetches.
    fn key(&self) -> Option<&str>;

    /// Fingerprint of the displayed content.
    fn content_hash(&self) -> Option<&str>;
}

/// One page window returned by a provider.
///
/// Fewer items than requested signals end-of-data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Items<T> {
    /// Items in provider order.
    pub items: Vec<T>,
    /// Offset the window starts at.
    pub offset: usize,
    /// Total size of the collection, when the provider knows it.
    pub total_count: Option<usize>,
}

impl<T> Items<T> {
    /// Window without a known total.
    pub fn new(items: Vec<T>, offset: usize) -> Self {
        Self {
            items,
            offset,
            total_count: None,
        }
    }

    /// Attach the collection size.
    pub fn with_total_count(mut self, total: usize) -> Self {
        self.total_count = Some(total);
        self
    }

    /// Empty window at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(Vec::new(), offset)
    }

    /// Number of items in the window.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the window carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slice `count` items starting at `offset` out of a full collection.
    pub fn slice_of(all: &[T], offset: usize, count: usize) -> Self
    where
        T: Clone,
    {
        let start = offset.min(all.len());
        let end = offset.saturating_add(count).min(all.len());
        Self::new(all[start..end].to_vec(), offset).with_total_count(all.len())
    }
}
