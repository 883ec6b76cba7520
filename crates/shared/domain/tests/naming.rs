use hearth_domain::ItemName;
use proptest::prelude::*;

proptest! {
    #[test]
    fn valid_grammar_always_parses(name in "[A-Za-z0-9_]{1,64}") {
        let parsed = ItemName::parse(name.clone()).expect("grammar name should parse");
        prop_assert_eq!(parsed.as_str(), name);
    }

    #[test]
    fn names_with_foreign_characters_are_rejected(
        prefix in "[A-Za-z0-9_]{0,8}",
        bad in "[^A-Za-z0-9_]",
        suffix in "[A-Za-z0-9_]{0,8}",
    ) {
        let candidate = format!("{prefix}{bad}{suffix}");
        prop_assert!(ItemName::parse(candidate).is_err());
    }

    #[test]
    fn parse_and_from_stored_agree_on_valid_names(name in "[A-Za-z0-9_]{1,64}") {
        let parsed = ItemName::parse(name.clone()).unwrap();
        let stored = ItemName::from_stored(name);
        prop_assert_eq!(parsed, stored);
    }
}
