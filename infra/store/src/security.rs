use crate::error::StoreError;
use std::path::{Path, PathBuf};

/// Validates a record key or namespace segment against the store grammar.
///
/// Keys are restricted to `[A-Za-z0-9_]+`, which makes them safe to use
/// verbatim as file names: no separators, no `..`, no absolute paths, so a
/// valid key can never escape the sandbox root by construction.
pub(crate) fn validate_segment(segment: &str, what: &'static str) -> Result<(), StoreError> {
    if segment.is_empty() {
        return Err(StoreError::InvalidKey {
            message: "EMPTY".into(),
            context: Some(format!("{what} cannot be empty").into()),
        });
    }

    if !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidKey {
            message: segment.to_owned().into(),
            context: Some(format!("{what} contains illegal characters").into()),
        });
    }

    Ok(())
}

/// File name suffix for record files.
///
/// The `.` is not part of the key grammar, so a record file name can never
/// equal a shard directory name. Without the suffix a short key like `ab`
/// would occupy the same path as the shard directory of any longer key
/// starting with `ab`.
pub(crate) const RECORD_SUFFIX: &str = ".rec";

/// Resolves the physical path of a record within the sandbox root.
///
/// Both namespace and key have already been validated, so the layout is purely
/// mechanical: `<root>/<namespace>/<shard1>/<shard2>/<key>.rec`. Sharding
/// splits the first four key characters into two two-character directories to
/// keep directory fan-out bounded on large stores; short keys are stored
/// unsharded at the namespace root.
pub(crate) fn record_path(root: &Path, namespace: &str, key: &str) -> PathBuf {
    let mut path = root.join(namespace);

    let chars: Vec<char> = key.chars().collect();
    if chars.len() >= 4 {
        path.push(chars[0..2].iter().collect::<String>());
        path.push(chars[2..4].iter().collect::<String>());
    }

    path.push(format!("{key}{RECORD_SUFFIX}"));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_and_separators() {
        assert!(validate_segment("../etc", "key").is_err());
        assert!(validate_segment("a/b", "key").is_err());
        assert!(validate_segment("", "key").is_err());
        assert!(validate_segment("Kitchen_Light1", "key").is_ok());
    }

    #[test]
    fn shards_long_keys_only() {
        let root = Path::new("/data");
        assert_eq!(
            record_path(root, "items", "abcdef"),
            PathBuf::from("/data/items/ab/cd/abcdef.rec")
        );
        assert_eq!(record_path(root, "items", "ab"), PathBuf::from("/data/items/ab.rec"));
    }

    #[test]
    fn short_key_never_collides_with_shard_directory() {
        // `ab` and `abcd` share a two-character prefix; the suffix keeps the
        // record file of the short key apart from the shard directory of the
        // long one.
        let root = Path::new("/data");
        let short = record_path(root, "items", "ab");
        let long = record_path(root, "items", "abcd");
        assert_eq!(long, PathBuf::from("/data/items/ab/cd/abcd.rec"));
        assert!(!long.starts_with(&short));
    }
}
