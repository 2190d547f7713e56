//! Settings for the cache builder itself
//!
//! Handles loading from a settings file, environment variables, and CLI
//! arguments with proper precedence (CLI > Env > File > Defaults).

use crate::domain::{Layout, UnitFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod loader;

pub use loader::load_settings;

/// File name of the bootstrap descriptor inside `bootstrap_dir`.
pub const BOOTSTRAP_DESCRIPTOR: &str = "app.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Application configuration directory.
    pub config_dir: PathBuf,
    /// Framework default configuration, consulted for names the application lacks.
    pub framework_config_dir: PathBuf,
    pub bootstrap_dir: PathBuf,
    pub cache_file: PathBuf,
    pub storage_dir: PathBuf,
    pub format: UnitFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            framework_config_dir: PathBuf::from("vendor/framework/config"),
            bootstrap_dir: PathBuf::from("bootstrap"),
            cache_file: PathBuf::from("bootstrap/cache/config.json"),
            storage_dir: PathBuf::from("storage"),
            format: UnitFormat::default(),
        }
    }
}

impl Settings {
    /// Resolve every location against `base`. Absolute settings are kept as-is.
    pub fn layout(&self, base: &Path) -> Layout {
        Layout {
            config_dir: base.join(&self.config_dir),
            framework_config_dir: base.join(&self.framework_config_dir),
            bootstrap_descriptor: base.join(&self.bootstrap_dir).join(BOOTSTRAP_DESCRIPTOR),
            cache_file: base.join(&self.cache_file),
            format: self.format,
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_config_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<UnitFormat>,
}
