//! A sandboxed, record-oriented persistent store.
//! It provides the durable key/record contract consumed by the registry layer:
//! string keys mapped to serializable records, with atomic per-key writes and
//! namespace isolation. All examples use temporary directories to avoid
//! writing to the real filesystem.
//!
//! # Core Features
//!
//! - **Key Grammar**: keys and namespaces are restricted to `[A-Za-z0-9_]+`,
//!   which rules out path traversal by construction.
//! - **Atomic Writes**: an "atomic swap" pattern (unique temp write + `fsync`
//!   + `rename`) guarantees a record is never observed half-written.
//! - **Transparent Compression**: optional LZ4 block compression.
//! - **Namespacing & Sharding**: logical partitioning per collection with
//!   automatic directory sharding to keep directory fan-out bounded.
//! - **Self-Healing**: orphaned temporary files are purged on connect.
//!
//! # Architectural Overview
//!
//! 1. [`Store`]: the thread-safe engine handle and entry point.
//! 2. [`RecordStore`]: a typed, namespaced view with
//!    `get`/`put`/`remove`/`get_all` record semantics.
//! 3. [`StoreBuilder`]: a type-safe fluent builder for configuration.
//!
//! # Examples
//!
//! ```rust
//! use hearth_store::{Compression, Store, StoreError};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Record {
//!     kind: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StoreError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("data");
//!     let store = Store::builder()
//!         .root(&root)
//!         .create(true)
//!         .compression(Compression::Lz4)
//!         .connect()
//!         .await?;
//!
//!     let records = store.records::<Record>("items")?;
//!     records.put("Kitchen_Light", &Record { kind: "Switch".into() }).await?;
//!
//!     let loaded = records.get("Kitchen_Light").await?;
//!     assert_eq!(loaded, Some(Record { kind: "Switch".into() }));
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod records;
mod security;

pub use builder::StoreBuilder;
pub use engine::{Compression, Store};
pub use error::{StoreError, StoreErrorExt};
pub use records::RecordStore;
