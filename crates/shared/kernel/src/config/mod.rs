use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Errors surfaced by the layered config loader.
#[hearth_derive::hearth_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from an optional file layered with environment overrides.
///
/// 1. **Base file**: read from `path` when given, otherwise from `hearth.*`
///    in the current working directory. The file is optional; an embedded
///    hub often runs on defaults alone.
/// 2. **Environment overrides**: variables prefixed with `HEARTH__`, with
///    `__` separating nesting levels (`HEARTH__STORE__ROOT` maps to
///    `store.root`).
///
/// # Errors
/// Returns [`ConfigError`] when the file exists but cannot be parsed, an
/// override value is malformed, or deserialization into `T` fails.
///
/// # Example
/// ```rust
/// use hearth_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct AppConfig {
///     verbose: bool,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("hearth"), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    let config = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix("HEARTH")
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
