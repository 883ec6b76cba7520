use hearth_domain::{Item, ItemName};
use std::sync::Arc;

/// What happened to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEventKind {
    Added,
    Updated,
    Removed,
}

/// A registry change notification.
///
/// Published on the event bus after the store and the live cache have both
/// been updated, so the order of events per item name matches the order of
/// committed operations. `item` carries the post-change item; for removals
/// it is the item that was removed.
#[derive(Debug, Clone)]
pub struct ItemEvent {
    pub kind: ItemEventKind,
    pub name: ItemName,
    pub item: Option<Arc<Item>>,
}

impl ItemEvent {
    #[must_use]
    pub const fn new(kind: ItemEventKind, name: ItemName, item: Option<Arc<Item>>) -> Self {
        Self { kind, name, item }
    }
}
