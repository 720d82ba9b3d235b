//! Shared fixtures for integration tests.

#![allow(dead_code)]

use pagelist::model::{ListItem, ViewError};
use pagelist::view_state::{ItemView, ItemViewFactory};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Item whose content hash is its revision tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: String,
    pub rev: String,
}

impl Item {
    pub fn new(key: &str, rev: &str) -> Self {
        Self {
            key: key.to_string(),
            rev: rev.to_string(),
        }
    }
}

impl ListItem for Item {
    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn content_hash(&self) -> Option<&str> {
        Some(&self.rev)
    }
}

/// Build items from `(key, rev)` pairs.
pub fn items(pairs: &[(&str, &str)]) -> Vec<Item> {
    pairs.iter().map(|(k, r)| Item::new(k, r)).collect()
}

/// Renders `key@rev` and tracks live handles. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct TrackingFactory {
    state: Rc<RefCell<TrackingState>>,
}

#[derive(Debug, Default)]
struct TrackingState {
    next: u64,
    live: HashSet<u64>,
    created: usize,
    double_reclaims: usize,
}

impl TrackingFactory {
    pub fn live(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn created(&self) -> usize {
        self.state.borrow().created
    }

    pub fn double_reclaims(&self) -> usize {
        self.state.borrow().double_reclaims
    }
}

impl ItemViewFactory<Item> for TrackingFactory {
    type Fragment = String;
    type Handle = u64;

    fn create_view(&mut self, item: &Item) -> Result<ItemView<String, u64>, ViewError> {
        let mut state = self.state.borrow_mut();
        let handle = state.next;
        state.next += 1;
        state.created += 1;
        state.live.insert(handle);
        Ok(ItemView::new(vec![format!("{}@{}", item.key, item.rev)], handle))
    }

    fn reclaim(&mut self, handle: u64) {
        let mut state = self.state.borrow_mut();
        if !state.live.remove(&handle) {
            state.double_reclaims += 1;
        }
    }
}
