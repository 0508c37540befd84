use crate::constants::{CONFIRMATION_WINDOW_SECS, DRAFT_PLACEHOLDER_TITLE, MEBIBYTE};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level engine configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfigInner {
    pub policy: PolicyConfig,
    pub listing: ListingConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into slices.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten, default)]
    inner: Arc<EngineConfigInner>,
}

impl Deref for EngineConfig {
    type Target = EngineConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for EngineConfig {
    fn deref_mut(&mut self) -> &mut EngineConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Business rule knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Seconds after registration during which the email can still be confirmed.
    pub confirmation_window_secs: u64,
    pub uploads: UploadPolicy,
    pub password: PasswordPolicy,
    /// Title given to drafts saved without one.
    pub draft_title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Lowercase extensions including the leading dot.
    pub allowed_extensions: Vec<String>,
    pub material_max_bytes: u64,
    pub general_max_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_digit: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    /// One of `trace`, `debug`, `info`, `warn`, `error`, `off`.
    pub level: String,
    pub console: bool,
    pub json: bool,
    pub path: Option<PathBuf>,
    pub env_filter: Option<String>,
}

// --- Default ---

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            confirmation_window_secs: CONFIRMATION_WINDOW_SECS,
            uploads: UploadPolicy::default(),
            password: PasswordPolicy::default(),
            draft_title: DRAFT_PLACEHOLDER_TITLE.to_owned(),
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![".pdf".to_owned(), ".docx".to_owned()],
            material_max_bytes: 10 * MEBIBYTE,
            general_max_bytes: 50 * MEBIBYTE,
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8, require_uppercase: true, require_digit: true }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { default_page_size: 10, max_page_size: 100 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "chub".to_owned(),
            level: "info".to_owned(),
            console: true,
            json: false,
            path: None,
            env_filter: None,
        }
    }
}
