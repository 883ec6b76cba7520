use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level hub configuration shared across subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfigInner {
    pub store: StoreConfig,
    pub events: EventsConfig,
    pub log: LogConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct HubConfig {
    #[serde(flatten, default)]
    inner: Arc<HubConfigInner>,
}

impl Deref for HubConfig {
    type Target = HubConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for HubConfig {
    fn deref_mut(&mut self) -> &mut HubConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Sandbox root directory for record files.
    pub root: PathBuf,
    /// Create the root directory when it does not exist.
    pub create: bool,
    pub compression: CompressionKind,
}

/// Record compression selector, kept transport-agnostic for the config file.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    None,
    #[default]
    Lz4,
}

/// Event bus configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Buffer capacity of broadcast channels.
    pub capacity: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Directory for rolling log files; console-only when absent.
    pub path: Option<PathBuf>,
}

// --- Default ---

impl Default for StoreConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("data"), create: true, compression: CompressionKind::Lz4 }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 128 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), path: None }
    }
}
