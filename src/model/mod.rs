//! Domain model: items, page windows, identifiers and errors.

pub mod error;
pub mod identifiers;
pub mod item;
pub mod key_action;
pub mod record;

pub use error::{FetchError, ListError, ViewError};
pub use identifiers::{EntryId, Epoch, MarkerId, SubscriptionId, TriggerRef};
pub use item::{Items, ListItem};
pub use key_action::KeyAction;
pub use record::{Record, RecordError, DEFAULT_KEY_FIELD};
