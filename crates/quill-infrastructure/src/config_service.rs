//! Configuration service implementation.
//!
//! Loads `QuillConfig` from `config.toml` and `secret.json`, then applies
//! environment overrides.

use crate::paths::QuillPaths;
use quill_core::config::{QuillConfig, SecretConfig};
use quill_core::error::{QuillError, Result};
use std::path::Path;
use std::sync::{Arc, RwLock};

pub const ENV_STORE_URL: &str = "QUILL_STORE_URL";
pub const ENV_MODEL: &str = "QUILL_MODEL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: QuillPaths,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<QuillConfig>>>,
}

impl ConfigService {
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            paths: QuillPaths::new(base_path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<QuillConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_config()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Resolves the Gemini API key from the environment or `secret.json`.
    pub fn gemini_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(ENV_GEMINI_API_KEY) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.load_secrets()?
            .gemini
            .map(|gemini| gemini.api_key)
            .ok_or_else(|| {
                QuillError::config(format!(
                    "Gemini API key not found: set {ENV_GEMINI_API_KEY} or add it to secret.json"
                ))
            })
    }

    fn load_config(&self) -> Result<QuillConfig> {
        let path = self.paths.config_file()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "[ConfigService] No config file, using defaults");
            return Ok(QuillConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|err| {
            QuillError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                err
            ))
        })
    }

    fn load_secrets(&self) -> Result<SecretConfig> {
        let path = self.paths.secret_file()?;
        if !path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(None)
    }
}

fn apply_env_overrides<F>(config: &mut QuillConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_STORE_URL).filter(|value| !value.trim().is_empty()) {
        config.store.base_url = url;
    }
    if let Some(model) = lookup(ENV_MODEL).filter(|value| !value.trim().is_empty()) {
        config.generation.model = model;
    }
}
