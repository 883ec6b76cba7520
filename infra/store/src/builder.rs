use crate::engine::{Compression, Store, StoreInner};
use crate::error::{StoreError, StoreErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Fluent configuration for a [`Store`].
///
/// The root directory is the only mandatory setting; [`StoreBuilder::connect`]
/// only becomes available once [`StoreBuilder::root`] has fixed it.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct StoreBuilder<S: Sealed = NoRoot> {
    state: S,
    compression: Compression,
    create: bool,
}

#[allow(private_bounds)]
impl<S: Sealed> StoreBuilder<S> {
    /// Selects the record compression. Defaults to [`Compression::None`].
    #[must_use = "Sets compression for the record store"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Whether a missing root directory is created on connect. Defaults to
    /// `true`; with `false`, connecting to a missing root is an I/O error.
    #[must_use = "Sets whether the store root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }
}

impl Default for StoreBuilder<NoRoot> {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub const fn new() -> Self {
        Self { state: NoRoot, compression: Compression::None, create: true }
    }

    /// Sets the sandbox root directory.
    #[must_use = "Sets the root directory path for the record store"]
    pub fn root(self, path: impl Into<PathBuf>) -> StoreBuilder<WithRoot> {
        StoreBuilder {
            state: WithRoot(path.into()),
            compression: self.compression,
            create: self.create,
        }
    }
}

impl StoreBuilder<WithRoot> {
    /// Consumes the configuration and opens the store.
    ///
    /// Creates the root when `create` is set, canonicalizes it so records
    /// cannot be redirected through symlinked roots, and purges temp files
    /// left by earlier crashes. The purge is non-critical; a failed cleanup
    /// logs a warning and the store opens anyway.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] when the root does not exist (and `create`
    /// is off) or cannot be created or resolved.
    pub async fn connect(self) -> Result<Store, StoreError> {
        let root = &self.state.0;

        if self.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap store root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped store root directory");
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        let store = Store {
            inner: Arc::new(StoreInner {
                root: canonical,
                compression: self.compression,
                tmp_counter: AtomicU64::new(1),
            }),
        };

        store.purge_tmp().await;

        Ok(store)
    }
}
