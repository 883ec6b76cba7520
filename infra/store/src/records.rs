use crate::engine::Store;
use crate::error::{StoreError, StoreErrorExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed, namespaced record collection.
///
/// `RecordStore` is the persistence contract consumed by the registry layer:
/// string keys mapped to one postcard-encoded record each, with `get`, `put`,
/// `remove`, and `get_all` semantics. Every write goes through the engine's
/// atomic swap, so a key is never observed in a half-written state.
///
/// Cloning is cheap; the view only holds a reference-counted engine handle.
///
/// # Example
///
/// ```rust
/// use hearth_store::{Store, StoreError};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Note { text: String }
///
/// #[tokio::main]
/// async fn main() -> Result<(), StoreError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("data");
///     let store = Store::builder().root(&root).connect().await?;
///     let notes = store.records::<Note>("notes")?;
///
///     let old = notes.put("n1", &Note { text: "hi".into() }).await?;
///     assert!(old.is_none());
///
///     let all = notes.get_all().await?;
///     assert_eq!(all.len(), 1);
///     assert_eq!(all[0].0, "n1");
///     Ok(())
/// }
/// ```
pub struct RecordStore<T> {
    store: Store,
    namespace: Arc<str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), namespace: self.namespace.clone(), _marker: PhantomData }
    }
}

impl<T> fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}

impl<T> RecordStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(store: Store, namespace: &str) -> Self {
        Self { store, namespace: Arc::from(namespace), _marker: PhantomData }
    }

    /// Reads the record stored under `key`, or `None` when absent.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for keys outside the grammar,
    /// [`StoreError::Codec`] when the on-disk bytes do not decode.
    pub async fn get(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.store.record_path(&self.namespace, key)?;
        match self.store.read_bytes(&path).await? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Stores `record` under `key`, returning the previous record if any.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for keys outside the grammar,
    /// [`StoreError::Io`] when the atomic write fails.
    pub async fn put(&self, key: &str, record: &T) -> Result<Option<T>, StoreError> {
        let path = self.store.record_path(&self.namespace, key)?;
        let previous = match self.store.read_bytes(&path).await? {
            Some(bytes) => Some(decode(&bytes)?),
            None => None,
        };

        let bytes = postcard::to_stdvec(record).context("Encoding record")?;
        self.store.write_bytes(&path, &bytes).await?;
        Ok(previous)
    }

    /// Removes the record stored under `key`, returning it if it existed.
    ///
    /// A missing key is a normal outcome and yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for keys outside the grammar,
    /// [`StoreError::Io`] when the deletion fails for another reason.
    pub async fn remove(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.store.record_path(&self.namespace, key)?;
        let previous = match self.store.read_bytes(&path).await? {
            Some(bytes) => Some(decode(&bytes)?),
            None => return Ok(None),
        };

        self.store.delete_file(&path).await?;
        Ok(previous)
    }

    /// Returns every `(key, record)` pair in the namespace, sorted by key.
    ///
    /// # Errors
    /// Propagates I/O and decode failures; a single corrupt record fails the
    /// whole enumeration rather than being silently skipped.
    pub async fn get_all(&self) -> Result<Vec<(String, T)>, StoreError> {
        let entries = self.store.list_records(&self.namespace).await?;
        let mut records = Vec::with_capacity(entries.len());

        for (key, path) in entries {
            if let Some(bytes) = self.store.read_bytes(&path).await? {
                records.push((key, decode(&bytes)?));
            }
        }

        Ok(records)
    }

    /// Returns every key in the namespace, sorted.
    ///
    /// # Errors
    /// Propagates enumeration I/O failures.
    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.store.list_records(&self.namespace).await?;
        Ok(entries.into_iter().map(|(key, _)| key).collect())
    }

    /// Checks whether a record exists without decoding it.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for keys outside the grammar.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.store.record_path(&self.namespace, key)?;
        Ok(path.exists())
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    postcard::from_bytes(bytes).context("Decoding record")
}
