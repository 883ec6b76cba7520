//! # Domain Models
//!
//! Pure domain types shared by every crate in the workspace: item names,
//! states, items, persisted records, and the hub configuration. Keep it
//! lean: no I/O, no locking, no async, just data and simple helpers.

pub mod config;
pub mod item;
pub mod name;
pub mod record;
pub mod state;

pub use config::HubConfig;
pub use item::{GROUP_TYPE, GroupFunctionSpec, Item, ItemBody};
pub use name::{ItemName, NameError};
pub use record::PersistedItem;
pub use state::{Command, State};
