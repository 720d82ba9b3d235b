//! In-memory provider.
//!
//! Holds a dataset behind shared ownership so a test (or a host) can keep a
//! clone, mutate the data between fetches, inject failures, and inspect the
//! exact calls the list made.

use super::ItemsProvider;
use crate::model::{FetchError, Items, ListItem};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// `fetch_items(offset, count)`
    Fetch {
        /// Requested offset.
        offset: usize,
        /// Requested count.
        count: usize,
    },
    /// `fetch_filtered_items(filter, offset, count)`
    Filtered {
        /// Requested filter.
        filter: String,
        /// Requested offset.
        offset: usize,
        /// Requested count.
        count: usize,
    },
}

struct MemoryState<T> {
    items: Vec<T>,
    calls: Vec<ProviderCall>,
    failures: VecDeque<FetchError>,
    latency: Option<Duration>,
}

/// Matches an item against a filter string.
pub type Matcher<T> = fn(&T, &str) -> bool;

/// Provider over an in-memory `Vec`. Clones share the same dataset and call log.
pub struct MemoryProvider<T> {
    state: Rc<RefCell<MemoryState<T>>>,
    matcher: Matcher<T>,
}

impl<T> Clone for MemoryProvider<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            matcher: self.matcher,
        }
    }
}

fn key_contains<T: ListItem>(item: &T, filter: &str) -> bool {
    item.key().is_some_and(|key| key.contains(filter))
}

impl<T: ListItem + Clone> MemoryProvider<T> {
    /// Provider over `items`; filters match on key substring.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                items,
                calls: Vec::new(),
                failures: VecDeque::new(),
                latency: None,
            })),
            matcher: key_contains::<T>,
        }
    }

    /// Use a custom filter predicate.
    pub fn with_matcher(mut self, matcher: Matcher<T>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Delay every response by `latency` (uses the tokio clock).
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.borrow_mut().latency = Some(latency);
        self
    }

    /// Replace the whole dataset.
    pub fn set_items(&self, items: Vec<T>) {
        self.state.borrow_mut().items = items;
    }

    /// Mutate the dataset in place.
    pub fn update(&self, f: impl FnOnce(&mut Vec<T>)) {
        f(&mut self.state.borrow_mut().items);
    }

    /// Make the next fetch (of either kind) fail with `err`.
    pub fn fail_next(&self, err: FetchError) {
        self.state.borrow_mut().failures.push_back(err);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.borrow().calls.clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    async fn respond(
        &self,
        call: ProviderCall,
        filter: Option<&str>,
        offset: usize,
        count: usize,
    ) -> Result<Items<T>, FetchError> {
        let latency = {
            let mut state = self.state.borrow_mut();
            state.calls.push(call);
            state.latency
        };
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.borrow_mut();
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }
        match filter {
            None => Ok(Items::slice_of(&state.items, offset, count)),
            Some(filter) => {
                let matching: Vec<T> = state
                    .items
                    .iter()
                    .filter(|item| (self.matcher)(*item, filter))
                    .cloned()
                    .collect();
                Ok(Items::slice_of(&matching, offset, count))
            }
        }
    }
}

#[async_trait(?Send)]
impl<T: ListItem + Clone> ItemsProvider for MemoryProvider<T> {
    type Item = T;

    async fn fetch_items(&self, offset: usize, count: usize) -> Result<Items<T>, FetchError> {
        self.respond(ProviderCall::Fetch { offset, count }, None, offset, count)
            .await
    }

    async fn fetch_filtered_items(
        &self,
        filter: &str,
        offset: usize,
        count: usize,
    ) -> Result<Items<T>, FetchError> {
        let call = ProviderCall::Filtered {
            filter: filter.to_string(),
            offset,
            count,
        };
        self.respond(call, Some(filter), offset, count).await
    }
}
