//! Core store engine providing sandboxed, atomic, and compressed record I/O.
//!
//! This module contains the primary [`Store`] handle. It owns the physical
//! filesystem root, enforces the key grammar, and exposes the raw byte-level
//! operations that [`RecordStore`](crate::RecordStore) builds its typed
//! contract on.

use crate::builder::StoreBuilder;
use crate::error::{StoreError, StoreErrorExt};
use crate::maintenance;
use crate::records::RecordStore;
use crate::security;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub(crate) const TMP_MARKER: &str = ".hearthtmp.";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    #[must_use]
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: &[u8]) -> Result<Vec<u8>, StoreError> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(data).context("Lz4 decompression failed")
            },
        }
    }
}

/// The internal shared state of a [`Store`] instance.
#[derive(Debug)]
pub struct StoreInner {
    /// The canonicalized physical path on the disk where all records live.
    pub(crate) root: PathBuf,
    /// Whether transparent LZ4 compression is enabled for this instance.
    pub(crate) compression: Compression,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to the record store engine.
///
/// `Store` keeps every record inside a sandboxed root directory and guarantees:
/// - **Atomic Writes**: a record file is replaced via unique temp file,
///   `fsync`, and rename, so a key is never observed half-written.
/// - **Namespacing**: each logical collection (e.g. `items`) lives in its own
///   subtree, accessed through a typed [`RecordStore`].
/// - **Transparent Compression**: optional LZ4 block compression.
/// - **Self-Healing**: stale temporary files are purged on connect.
///
/// The handle is internally reference-counted and cheap to clone.
///
/// # Example
///
/// ```rust
/// use hearth_store::{Store, StoreError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StoreError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("data");
///     let store = Store::builder().root(&root).create(true).connect().await?;
///
///     let items = store.records::<String>("demo")?;
///     items.put("greeting", &"hello".to_owned()).await?;
///     assert_eq!(items.get("greeting").await?.as_deref(), Some("hello"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    pub(crate) inner: Arc<StoreInner>,
}

impl Deref for Store {
    type Target = StoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Store {
    #[must_use = "The store is not initialized until you call .connect()"]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Returns a typed, namespaced record collection.
    ///
    /// Namespaces partition the store by concern (e.g. `items`, `links`)
    /// while sharing the root, compression setting, and sandbox.
    ///
    /// # Constraints
    /// Namespace names follow the same `[A-Za-z0-9_]+` grammar as record keys.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] if the namespace fails the grammar.
    pub fn records<T>(&self, namespace: &str) -> Result<RecordStore<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        security::validate_segment(namespace, "namespace")?;
        Ok(RecordStore::new(self.clone(), namespace))
    }

    /// Resolves the physical path of a record after validating the key.
    pub(crate) fn record_path(&self, namespace: &str, key: &str) -> Result<PathBuf, StoreError> {
        security::validate_segment(key, "key")?;
        Ok(security::record_path(&self.root, namespace, key))
    }

    /// Reads a record file, returning `None` when the key has no record.
    pub(crate) async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        self.inner.compression.decompress(&data).map(Some)
    }

    /// Writes a record file atomically.
    ///
    /// The data is written to a unique temporary file (`*.hearthtmp.<id>`),
    /// synced to hardware, and renamed over the final destination. Parent and
    /// shard directories are created automatically. On platforms without
    /// atomic replace for existing targets, falls back to remove-then-rename.
    pub(crate) async fn write_bytes(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", path.display()))?;
        }

        let temp = unique_tmp_path(path, &self.tmp_counter);
        let final_data = self.inner.compression.compress(data);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&final_data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, path).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(path)
                    .await
                    .context(format!("Failed to replace existing record: {}", path.display()))?;
                fs::rename(&temp, path).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    path.display()
                ))?;
            } else {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), path.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = path.parent() {
            Self::sync_dir(parent).await;
        }

        debug!(path = %path.display(), "Record saved atomically");
        Ok(())
    }

    /// Deletes a record file. Returns `false` when the file was already gone.
    pub(crate) async fn delete_file(&self, path: &Path) -> Result<bool, StoreError> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Record deleted");
                Ok(true)
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::Io {
                source: err,
                context: Some(format!("Failed to delete: {}", path.display()).into()),
            }),
        }
    }

    /// Enumerates every record file under a namespace as `(key, path)` pairs.
    ///
    /// The walk skips temporary files and anything that is not a record file
    /// with a well-formed key. The shard layout is an implementation detail,
    /// so keys are recovered from the file names alone by stripping the
    /// record suffix.
    pub(crate) async fn list_records(
        &self,
        namespace: &str,
    ) -> Result<Vec<(String, PathBuf)>, StoreError> {
        let dir = self.root.join(namespace);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        tokio::task::spawn_blocking(move || {
            let mut entries = Vec::new();
            for entry in walkdir::WalkDir::new(&dir).into_iter().flatten() {
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(name) = entry.path().file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if name.contains(TMP_MARKER) {
                    continue;
                }
                let Some(key) = name.strip_suffix(security::RECORD_SUFFIX) else {
                    continue;
                };
                if security::validate_segment(key, "key").is_ok() {
                    entries.push((key.to_owned(), entry.into_path()));
                }
            }
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries
        })
        .await
        .map_err(|e| StoreError::Internal {
            message: e.to_string().into(),
            context: Some("Record enumeration task panicked".into()),
        })
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("record");
    let tmp_name = format!("{file_name}{TMP_MARKER}{counter}");
    target.with_file_name(tmp_name)
}
