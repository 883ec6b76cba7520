//! Membership derivation over backward edges.
//!
//! Items store the names of the groups they belong to; groups store nothing.
//! Member lists are therefore derived by scanning those backward edges,
//! which keeps the persisted records free of forward references and makes
//! load order irrelevant.

use fxhash::FxHashSet;
use hearth_domain::{Item, ItemName};
use std::sync::Arc;

/// Direct members of `group`: every item listing it in `group_names`.
#[must_use]
pub fn members_of<'a>(group: &str, all: &'a [Arc<Item>]) -> Vec<&'a Arc<Item>> {
    all.iter().filter(|item| item.is_member_of(group)).collect()
}

/// Transitive members of `group`, depth-first in discovery order, each name
/// listed once.
///
/// The membership graph may contain cycles (an item can claim membership in
/// anything, including its own ancestors); the visited set makes the
/// traversal terminate regardless.
#[must_use]
pub fn transitive_members_of(group: &str, all: &[Arc<Item>]) -> Vec<ItemName> {
    let mut visited = FxHashSet::default();
    visited.insert(group.to_owned());
    let mut found = Vec::new();
    walk(group, all, &mut visited, &mut found);
    found
}

fn walk(group: &str, all: &[Arc<Item>], visited: &mut FxHashSet<String>, found: &mut Vec<ItemName>) {
    for item in members_of(group, all) {
        if visited.insert(item.name.as_str().to_owned()) {
            found.push(item.name.clone());
            if item.is_group() {
                walk(item.name.as_str(), all, visited, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_domain::State;

    fn simple(name: &str, groups: &[&str]) -> Arc<Item> {
        let mut item =
            Item::simple(ItemName::parse(name).unwrap(), "Number").with_state(State::Number(5.0));
        for group in groups {
            item = item.in_group(*group);
        }
        Arc::new(item)
    }

    fn group(name: &str, groups: &[&str]) -> Arc<Item> {
        let mut item = Item::group(ItemName::parse(name).unwrap());
        for g in groups {
            item = item.in_group(*g);
        }
        Arc::new(item)
    }

    #[test]
    fn direct_members_only() {
        let all = vec![
            group("g1", &[]),
            group("g2", &["g1"]),
            simple("m1", &["g1"]),
            simple("m2", &["g2"]),
        ];

        let members = members_of("g1", &all);
        let names: Vec<&str> = members.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["g2", "m1"]);
    }

    #[test]
    fn transitive_traversal_dedupes() {
        let all = vec![
            group("g1", &[]),
            group("g2", &["g1"]),
            simple("m1", &["g1", "g2"]),
            simple("m2", &["g2"]),
        ];

        let names: Vec<String> =
            transitive_members_of("g1", &all).into_iter().map(String::from).collect();
        assert_eq!(names, vec!["g2", "m1", "m2"]);
    }

    #[test]
    fn membership_cycles_terminate() {
        // g1 and g2 claim membership in each other.
        let all = vec![group("g1", &["g2"]), group("g2", &["g1"]), simple("m1", &["g2"])];

        let names: Vec<String> =
            transitive_members_of("g1", &all).into_iter().map(String::from).collect();
        assert_eq!(names, vec!["g2", "m1"]);
    }

    #[test]
    fn unknown_group_has_no_members() {
        let all = vec![simple("m1", &["g1"])];
        assert!(transitive_members_of("nope", &all).is_empty());
    }
}
