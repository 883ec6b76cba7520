//! The types nearly every slice needs.

pub use crate::config::{ConfigError, load_config};
pub use hearth_domain::{
    Command, GROUP_TYPE, GroupFunctionSpec, HubConfig, Item, ItemBody, ItemName, PersistedItem,
    State,
};
