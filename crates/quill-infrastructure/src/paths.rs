//! Unified path management for quill configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/quill/
//! ├── config.toml     # Application configuration
//! └── secret.json     # API keys
//! ```

use quill_core::error::{QuillError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "quill";
const CONFIG_FILE: &str = "config.toml";
const SECRET_FILE: &str = "secret.json";

/// Resolves quill's files, optionally under an explicit base directory.
#[derive(Debug, Clone, Default)]
pub struct QuillPaths {
    base: Option<PathBuf>,
}

impl QuillPaths {
    /// Uses `base` instead of the platform config directory when given.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the quill configuration directory (e.g. `~/.config/quill/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| QuillError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join(APP_DIR))
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    pub fn secret_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(SECRET_FILE))
    }
}
