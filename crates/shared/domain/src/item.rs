use crate::name::ItemName;
use crate::state::State;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Type tag carried by group items.
pub const GROUP_TYPE: &str = "Group";

/// The named, persistable form of a group aggregation function.
///
/// Resolution of the name to an executable combinator happens outside the
/// domain layer; records only ever carry the name and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFunctionSpec {
    pub name: String,
    pub params: Vec<String>,
}

impl GroupFunctionSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self { name: name.into(), params }
    }
}

/// What kind of item this is, and the payload that kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemBody {
    /// A plain stateful item (`Switch`, `Number`, `String`, ...).
    Simple { item_type: String, state: State },
    /// A group. The optional base item lends the group a state type; the
    /// optional function aggregates member states into the group state.
    Group { base: Option<Box<Item>>, function: Option<GroupFunctionSpec> },
}

/// A live registry entry.
///
/// Membership is modeled with backward edges only: an item lists the names
/// of the groups it belongs to in `group_names`. Groups never store member
/// lists; those are derived by scanning the backward edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: ItemName,
    pub label: Option<String>,
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
    pub group_names: Vec<String>,
    pub body: ItemBody,
}

impl Item {
    /// Creates a simple item of `item_type` with an undefined state.
    #[must_use]
    pub fn simple(name: ItemName, item_type: impl Into<String>) -> Self {
        Self {
            name,
            label: None,
            category: None,
            tags: BTreeSet::new(),
            group_names: Vec::new(),
            body: ItemBody::Simple { item_type: item_type.into(), state: State::Undef },
        }
    }

    /// Creates a group item without a base item or function.
    #[must_use]
    pub fn group(name: ItemName) -> Self {
        Self {
            name,
            label: None,
            category: None,
            tags: BTreeSet::new(),
            group_names: Vec::new(),
            body: ItemBody::Group { base: None, function: None },
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Adds a backward membership edge towards `group`.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group_names.push(group.into());
        self
    }

    /// Sets the state of a simple item. No-op on groups.
    #[must_use]
    pub fn with_state(mut self, new: State) -> Self {
        if let ItemBody::Simple { state, .. } = &mut self.body {
            *state = new;
        }
        self
    }

    /// Attaches a base item to a group. No-op on simple items.
    #[must_use]
    pub fn with_base(mut self, base: Self) -> Self {
        if let ItemBody::Group { base: slot, .. } = &mut self.body {
            *slot = Some(Box::new(base));
        }
        self
    }

    /// Attaches an aggregation function to a group. No-op on simple items.
    #[must_use]
    pub fn with_function(mut self, spec: GroupFunctionSpec) -> Self {
        if let ItemBody::Group { function, .. } = &mut self.body {
            *function = Some(spec);
        }
        self
    }

    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self.body, ItemBody::Group { .. })
    }

    /// The item's type tag (`"Group"` for groups).
    #[must_use]
    pub fn item_type(&self) -> &str {
        match &self.body {
            ItemBody::Simple { item_type, .. } => item_type,
            ItemBody::Group { .. } => GROUP_TYPE,
        }
    }

    /// The state of a simple item; groups have no stored state of their own.
    #[must_use]
    pub const fn state(&self) -> Option<&State> {
        match &self.body {
            ItemBody::Simple { state, .. } => Some(state),
            ItemBody::Group { .. } => None,
        }
    }

    /// Whether this item lists `group` among its memberships.
    #[must_use]
    pub fn is_member_of(&self, group: &str) -> bool {
        self.group_names.iter().any(|g| g == group)
    }
}
