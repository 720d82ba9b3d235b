//! Test doubles shared by unit tests.
//!
//! `TestItem` is a keyed, hashed item; `RecordingFactory` renders it as
//! strings and records every create/reclaim so tests can assert exact counts.

use crate::model::{Items, ListItem, ViewError};
use crate::view_state::{ItemView, ItemViewFactory};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Keyed item rendered as `lines` fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    pub key: Option<String>,
    pub hash: Option<String>,
    pub lines: usize,
}

impl TestItem {
    pub fn new(key: &str, hash: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            hash: Some(hash.to_string()),
            lines: 1,
        }
    }

    pub fn unkeyed() -> Self {
        Self {
            key: None,
            hash: None,
            lines: 1,
        }
    }

    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = lines;
        self
    }
}

impl ListItem for TestItem {
    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn content_hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }
}

/// Build a page of `(key, hash)` items.
pub fn page(offset: usize, items: &[(&str, &str)]) -> Items<TestItem> {
    Items::new(
        items.iter().map(|(k, h)| TestItem::new(k, h)).collect(),
        offset,
    )
}

#[derive(Debug, Default)]
pub struct FactoryLog {
    pub created: Vec<String>,
    pub reclaimed: Vec<u64>,
    pub live: HashSet<u64>,
    next: u64,
    pub fail_keys: HashSet<String>,
}

/// View factory that records calls. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    pub log: Rc<RefCell<FactoryLog>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.log.borrow().created.len()
    }

    pub fn reclaimed(&self) -> usize {
        self.log.borrow().reclaimed.len()
    }

    pub fn live(&self) -> usize {
        self.log.borrow().live.len()
    }

    pub fn fail_for(&self, key: &str) {
        self.log.borrow_mut().fail_keys.insert(key.to_string());
    }
}

impl ItemViewFactory<TestItem> for RecordingFactory {
    type Fragment = String;
    type Handle = u64;

    fn create_view(&mut self, item: &TestItem) -> Result<ItemView<String, u64>, ViewError> {
        let mut log = self.log.borrow_mut();
        let key = item.key.clone().unwrap_or_default();
        if log.fail_keys.contains(&key) {
            return Err(ViewError::Build {
                key: item.key.clone(),
                reason: "scripted failure".to_string(),
            });
        }
        let hash = item.hash.clone().unwrap_or_default();
        let handle = log.next;
        log.next += 1;
        log.live.insert(handle);
        log.created.push(key.clone());
        let output = (0..item.lines).map(|i| format!("{key}:{hash}:{i}")).collect();
        Ok(ItemView::new(output, handle))
    }

    fn reclaim(&mut self, handle: u64) {
        let mut log = self.log.borrow_mut();
        assert!(log.live.remove(&handle), "handle {handle} reclaimed twice");
        log.reclaimed.push(handle);
    }
}
