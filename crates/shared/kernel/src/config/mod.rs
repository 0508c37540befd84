use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[chub_derive::chub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Environment prefix for overrides, e.g. `CHUB__POLICY__CONFIRMATION_WINDOW_SECS=60`.
pub const ENV_PREFIX: &str = "CHUB";

const DEFAULT_FILE: &str = "chub";

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// 1. **Base File**: loads settings from `path`. An explicit path must exist; without one the
///    loader looks for an optional `chub.{toml,json,yaml}` in the working directory.
/// 2. **Environment Overrides**: overlays variables prefixed with `CHUB__`. Nested keys are
///    separated by double underscores (`CHUB__LISTING__MAX_PAGE_SIZE` maps to
///    `listing.max_page_size`).
///
/// # Errors
/// This function will return an error if:
/// * An explicitly given configuration file cannot be found.
/// * The merged sources do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use chub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path
        .map_or_else(|| (PathBuf::from(DEFAULT_FILE), false), |p| (p.as_ref().to_path_buf(), true));

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
