//! Identifier newtypes for render-session bookkeeping.
//!
//! Raw counters are never exposed for mutation; ids are allocated by the
//! structure that owns them (sequence, entry table, gate).

use std::fmt;

/// Reset counter for one render session.
///
/// Every asynchronous operation captures the epoch when it is issued. A hard
/// reset advances the epoch, so completions carrying an older value are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// First epoch of a fresh session.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Numeric value, for logging and assertions.
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch#{}", self.0)
    }
}

/// Boundary sentinel in a rendered sequence.
///
/// Markers are allocated in pairs (begin, end) and never reused within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(u64);

impl MarkerId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Slot of a rendered entry in the entry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Handle returned by a visibility gate subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a gate-allocated subscription number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Numeric value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Identifies the load-more sentinel a list renders at its tail.
///
/// Chosen by the host; the host reports visibility of this sentinel to its gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerRef(u64);

impl TriggerRef {
    /// Create a trigger reference.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TriggerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger#{}", self.0)
    }
}
