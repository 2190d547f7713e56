//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::{load_settings, Settings, SettingsOverrides};

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Application base directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR", env = "CONFIG_CACHE_BASE_PATH")]
    pub base_path: Option<PathBuf>,

    /// Settings file (defaults to config-cache.toml in the base directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

impl GlobalArgs {
    /// Absolute base path. An explicit path must exist.
    pub fn resolve_base_path(&self) -> Result<PathBuf> {
        match &self.base_path {
            Some(path) => path
                .canonicalize()
                .with_context(|| format!("Base path not found: {}", path.display())),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    pub fn load_settings(&self, base: &Path, overrides: &SettingsOverrides) -> Result<Settings> {
        load_settings(base, self.settings.as_deref(), overrides)
    }
}
