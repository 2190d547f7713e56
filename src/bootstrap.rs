//! Application context construction from the bootstrap descriptor
//!
//! Every cache build starts from a fresh context so configuration documents
//! see the host's current storage path rather than a stale one.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_APP_NAME: &str = "app";
const DEFAULT_APP_ENV: &str = "production";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Bootstrap descriptor not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed reading bootstrap descriptor: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid bootstrap descriptor: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `bootstrap/app.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppDescriptor {
    pub name: Option<String>,
    pub env: Option<String>,
    /// Storage directory, relative to the base path. Overridden by the host.
    pub storage: Option<PathBuf>,
}

/// In-memory application context used while loading configuration units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    base_path: PathBuf,
    name: String,
    env: String,
    storage_path: PathBuf,
}

impl AppContext {
    /// Build a context from the descriptor at `descriptor_path`.
    pub fn bootstrap(descriptor_path: &Path, base_path: &Path) -> Result<Self, BootstrapError> {
        if !descriptor_path.is_file() {
            return Err(BootstrapError::Missing { path: descriptor_path.to_path_buf() });
        }
        let content = fs::read_to_string(descriptor_path).map_err(|source| {
            BootstrapError::Read { path: descriptor_path.to_path_buf(), source }
        })?;
        let descriptor: AppDescriptor = toml::from_str(&content).map_err(|source| {
            BootstrapError::Parse { path: descriptor_path.to_path_buf(), source }
        })?;

        tracing::debug!("Bootstrapped application context from {}", descriptor_path.display());
        Ok(Self::from_descriptor(descriptor, base_path))
    }

    pub fn from_descriptor(descriptor: AppDescriptor, base_path: &Path) -> Self {
        let storage_path = match descriptor.storage {
            Some(storage) => base_path.join(storage),
            None => base_path.join("storage"),
        };
        Self {
            base_path: base_path.to_path_buf(),
            name: descriptor.name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            env: descriptor.env.unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            storage_path,
        }
    }

    pub fn use_storage_path(&mut self, path: impl Into<PathBuf>) {
        self.storage_path = path.into();
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &str {
        &self.env
    }
}
