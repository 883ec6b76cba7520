use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A validated item identifier.
///
/// Names are unique registry keys and double as file names in the persistent
/// store, so the grammar is deliberately narrow: one or more ASCII letters,
/// digits, or underscores.
///
/// Records loaded from disk may predate the current grammar; use
/// [`ItemName::from_stored`] for those and [`ItemName::parse`] everywhere
/// else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

/// Rejection reason for a candidate item name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item name '{name}': {reason}")]
pub struct NameError {
    pub name: String,
    pub reason: &'static str,
}

impl ItemName {
    /// Validates `name` against the identifier grammar.
    ///
    /// # Errors
    /// Returns [`NameError`] when the name is empty or contains a character
    /// outside `[A-Za-z0-9_]`.
    pub fn parse(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NameError { name, reason: "must not be empty" });
        }
        if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(NameError {
                name,
                reason: "only ASCII letters, digits, and '_' are allowed",
            });
        }
        Ok(Self(name))
    }

    /// Wraps a name read back from the store without validating it.
    ///
    /// Stored records are accepted as-is so that data written under an older
    /// grammar keeps loading.
    #[must_use]
    pub fn from_stored(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ItemName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifier_grammar() {
        for name in ["Kitchen_Light", "g1", "UPPER", "_", "0numeric"] {
            assert!(ItemName::parse(name).is_ok(), "{name} should parse");
        }
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["", "with space", "dash-ed", "dot.ted", "ünïcode", "a/b"] {
            assert!(ItemName::parse(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn from_stored_bypasses_validation() {
        let name = ItemName::from_stored("legacy-name.v1");
        assert_eq!(name.as_str(), "legacy-name.v1");
    }

    #[test]
    fn serde_is_transparent() {
        let name = ItemName::parse("Porch").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, r#""Porch""#);
        let back: ItemName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
