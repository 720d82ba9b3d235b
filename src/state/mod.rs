//! Pure core of the paginated list (no I/O, no timers).
//!
//! [`ListSession`] owns the rendered entries and every flag. Page loading,
//! filter changes, resets and reconciliation are `impl` blocks split across
//! the submodules below.

mod filter;
mod gate;
pub mod loader;
pub mod reconcile;
pub mod session;


pub use loader::{LoadOutcome, PageRequest};
pub use reconcile::{ReconcileStats, RefreshOutcome, RefreshRequest};
pub use session::{ListConfig, ListSession};
