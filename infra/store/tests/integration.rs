use hearth_store::*;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TestRecord {
    kind: String,
    members: Vec<String>,
}

fn record(kind: &str) -> TestRecord {
    TestRecord { kind: kind.to_owned(), members: vec!["g1".to_owned()] }
}

#[tokio::test]
async fn test_invalid_keys_rejected() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    for key in ["../escape", "a/b", "", "white space", "dash-ed"] {
        let err = records.get(key).await.expect_err("key should be rejected");
        assert!(matches!(err, StoreError::InvalidKey { .. }), "unexpected error for {key}: {err:?}");
    }

    assert!(store.records::<TestRecord>("../items").is_err());
}

#[tokio::test]
async fn test_put_get_roundtrip_uncompressed() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    let previous = records.put("Kitchen_Light", &record("Switch")).await.unwrap();
    assert!(previous.is_none());
    assert!(records.contains("Kitchen_Light").unwrap());

    let loaded = records.get("Kitchen_Light").await.unwrap();
    assert_eq!(loaded, Some(record("Switch")));
}

#[tokio::test]
async fn test_put_get_roundtrip_compressed() {
    let temp = TempDir::new().unwrap();
    let store =
        Store::builder().root(temp.path()).compression(Compression::Lz4).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    records.put("Big_Record", &record(&"x".repeat(4096))).await.unwrap();
    let loaded = records.get("Big_Record").await.unwrap();
    assert_eq!(loaded, Some(record(&"x".repeat(4096))));
}

#[tokio::test]
async fn test_put_returns_previous_record() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    records.put("Lamp", &record("Switch")).await.unwrap();
    let previous = records.put("Lamp", &record("Dimmer")).await.unwrap();
    assert_eq!(previous, Some(record("Switch")));
    assert_eq!(records.get("Lamp").await.unwrap(), Some(record("Dimmer")));
}

#[tokio::test]
async fn test_namespace_isolation() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();

    let items = store.records::<TestRecord>("items").unwrap();
    let links = store.records::<TestRecord>("links").unwrap();

    items.put("shared_key", &record("Switch")).await.unwrap();
    links.put("shared_key", &record("Number")).await.unwrap();

    assert_eq!(items.get("shared_key").await.unwrap(), Some(record("Switch")));
    assert_eq!(links.get("shared_key").await.unwrap(), Some(record("Number")));

    assert_eq!(items.keys().await.unwrap(), vec!["shared_key".to_owned()]);
}

#[tokio::test]
async fn test_remove_returns_previous_and_tolerates_missing() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    records.put("Lamp", &record("Switch")).await.unwrap();
    assert_eq!(records.remove("Lamp").await.unwrap(), Some(record("Switch")));
    assert!(!records.contains("Lamp").unwrap());

    // Removing an absent key is a normal outcome, not an error.
    assert_eq!(records.remove("Lamp").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_all_recovers_keys_across_shards() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    // Mix of sharded (>= 4 chars) and unsharded keys.
    for key in ["ab", "abc", "abcd", "Kitchen_Light", "Zz9_"] {
        records.put(key, &record(key)).await.unwrap();
    }

    let all = records.get_all().await.unwrap();
    let keys: Vec<&str> = all.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["Kitchen_Light", "Zz9_", "ab", "abc", "abcd"]);
    for (key, rec) in &all {
        assert_eq!(rec.kind, *key);
    }
}

#[tokio::test]
async fn test_short_key_coexists_with_prefixed_long_key() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    // `abcd` shards into the `ab/cd/` directory; the record for the plain
    // `ab` key must not occupy that directory's name. Cover both orders.
    records.put("ab", &record("Switch")).await.unwrap();
    records.put("abcd", &record("Dimmer")).await.unwrap();
    records.put("cdef", &record("Number")).await.unwrap();
    records.put("cd", &record("Contact")).await.unwrap();

    assert_eq!(records.get("ab").await.unwrap(), Some(record("Switch")));
    assert_eq!(records.get("abcd").await.unwrap(), Some(record("Dimmer")));
    assert_eq!(records.get("cd").await.unwrap(), Some(record("Contact")));
    assert_eq!(records.get("cdef").await.unwrap(), Some(record("Number")));

    assert_eq!(records.remove("ab").await.unwrap(), Some(record("Switch")));
    assert_eq!(records.get("abcd").await.unwrap(), Some(record("Dimmer")));
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let temp = TempDir::new().unwrap();
    let store = Store::builder().root(temp.path()).connect().await.unwrap();
    let records = store.records::<TestRecord>("items").unwrap();

    assert_eq!(records.get("missing").await.unwrap(), None);
    assert!(records.get_all().await.unwrap().is_empty());
}
