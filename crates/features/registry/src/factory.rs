use hearth_domain::record::split_type;
use hearth_domain::{Item, ItemName};

/// Builds live items from a type tag.
///
/// Factories are consulted in registration order; the first one returning
/// `Some` wins. Returning `None` means "not my type"; the registry then
/// parks the record in the deferred table until a capable factory shows up.
pub trait ItemFactory: Send + Sync {
    /// Creates an item of `item_type` named `name`, or `None` when this
    /// factory does not handle the type. `item_type` may carry a dimension
    /// extension (`Number:Temperature`).
    fn create(&self, item_type: &str, name: &ItemName) -> Option<Item>;
}

/// Factory for the built-in simple item types.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreItemFactory;

impl ItemFactory for CoreItemFactory {
    fn create(&self, item_type: &str, name: &ItemName) -> Option<Item> {
        let (main, _dimension) = split_type(item_type);
        match main.as_str() {
            "Switch" | "Number" | "String" => Some(Item::simple(name.clone(), item_type)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_factory_builds_known_types() {
        let factory = CoreItemFactory;
        let name = ItemName::parse("Outside_Temp").unwrap();

        let item = factory.create("Number:Temperature", &name).expect("number item");
        assert_eq!(item.item_type(), "Number:Temperature");

        assert!(factory.create("Switch", &name).is_some());
        assert!(factory.create("String", &name).is_some());
        assert!(factory.create("Color", &name).is_none());
    }
}
