use crate::item::{GROUP_TYPE, Item, ItemBody};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Separator between a main item type and its dimension extension,
/// as in `Number:Temperature`.
const TYPE_EXTENSION_SEPARATOR: char = ':';

/// The durable projection of an [`Item`].
///
/// Records carry names and strings only, never live item references, so
/// they can always be written, even when the items they mention do not
/// exist yet. Reconstruction into a live [`Item`] happens in the registry,
/// where item factories are available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedItem {
    /// Main type tag (`Switch`, `Number`, `String`, or `Group`).
    pub item_type: String,
    /// For groups: the full type of the base item, when the group has one.
    pub base_item_type: Option<String>,
    pub group_names: Vec<String>,
    pub tags: BTreeSet<String>,
    pub label: Option<String>,
    pub category: Option<String>,
    /// For groups: the name of the aggregation function, when set.
    pub function_name: Option<String>,
    pub function_params: Vec<String>,
    /// Unit dimension of a number item (`Temperature` in `Number:Temperature`).
    pub dimension: Option<String>,
}

impl PersistedItem {
    /// Projects a live item into its durable form.
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        let (item_type, base_item_type, function_name, function_params, dimension) =
            match &item.body {
                ItemBody::Simple { item_type, .. } => {
                    let (main, dimension) = split_type(item_type);
                    (main, None, None, Vec::new(), dimension)
                },
                ItemBody::Group { base, function } => (
                    GROUP_TYPE.to_owned(),
                    base.as_ref().map(|b| b.item_type().to_owned()),
                    function.as_ref().map(|f| f.name.clone()),
                    function.as_ref().map(|f| f.params.clone()).unwrap_or_default(),
                    None,
                ),
            };

        Self {
            item_type,
            base_item_type,
            group_names: item.group_names.clone(),
            tags: item.tags.clone(),
            label: item.label.clone(),
            category: item.category.clone(),
            function_name,
            function_params,
            dimension,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.item_type == GROUP_TYPE
    }

    /// The full type string handed to item factories, with the dimension
    /// extension re-attached when present.
    #[must_use]
    pub fn full_item_type(&self) -> String {
        self.dimension.as_ref().map_or_else(
            || self.item_type.clone(),
            |dim| format!("{}{TYPE_EXTENSION_SEPARATOR}{dim}", self.item_type),
        )
    }
}

/// Splits a full type string into its main type and optional dimension.
#[must_use]
pub fn split_type(full: &str) -> (String, Option<String>) {
    match full.split_once(TYPE_EXTENSION_SEPARATOR) {
        Some((main, ext)) if !ext.is_empty() => (main.to_owned(), Some(ext.to_owned())),
        _ => (full.to_owned(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::GroupFunctionSpec;
    use crate::name::ItemName;
    use crate::state::State;

    fn name(s: &str) -> ItemName {
        ItemName::parse(s).unwrap()
    }

    #[test]
    fn simple_item_projection() {
        let item = Item::simple(name("Outside_Temp"), "Number:Temperature")
            .with_state(State::Number(21.5))
            .with_label("Outside temperature")
            .with_tag("weather")
            .in_group("Outdoor");

        let record = PersistedItem::from_item(&item);
        assert_eq!(record.item_type, "Number");
        assert_eq!(record.dimension.as_deref(), Some("Temperature"));
        assert_eq!(record.full_item_type(), "Number:Temperature");
        assert_eq!(record.group_names, vec!["Outdoor".to_owned()]);
        assert!(record.tags.contains("weather"));
        assert!(!record.is_group());
        assert!(record.function_name.is_none());
    }

    #[test]
    fn group_item_projection() {
        let group = Item::group(name("Temperatures"))
            .with_base(Item::simple(name("Temperatures"), "Number"))
            .with_function(GroupFunctionSpec::new("AVG", vec![]));

        let record = PersistedItem::from_item(&group);
        assert!(record.is_group());
        assert_eq!(record.item_type, GROUP_TYPE);
        assert_eq!(record.base_item_type.as_deref(), Some("Number"));
        assert_eq!(record.function_name.as_deref(), Some("AVG"));
        assert!(record.function_params.is_empty());
    }

    #[test]
    fn type_splitting() {
        assert_eq!(split_type("Switch"), ("Switch".to_owned(), None));
        assert_eq!(
            split_type("Number:Energy"),
            ("Number".to_owned(), Some("Energy".to_owned()))
        );
        assert_eq!(split_type("Number:"), ("Number:".to_owned(), None));
    }
}
