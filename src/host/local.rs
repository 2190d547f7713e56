//! Host backed by the local filesystem and resolved settings

use super::{Filesystem, Host, HostError, LocalFs, CLEAR_COMMAND};
use crate::cache::clear_cache;
use crate::config::Settings;
use crate::domain::Layout;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalHost {
    base: PathBuf,
    storage: PathBuf,
    layout: Layout,
    fs: LocalFs,
}

impl LocalHost {
    pub fn new(base: impl Into<PathBuf>, settings: &Settings) -> Self {
        let base = base.into();
        let layout = settings.layout(&base);
        let storage = base.join(&settings.storage_dir);
        Self { base, storage, layout, fs: LocalFs::new() }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl Host for LocalHost {
    fn base_path(&self, relative: &str) -> PathBuf {
        if relative.is_empty() {
            self.base.clone()
        } else {
            self.base.join(relative)
        }
    }

    fn storage_path(&self) -> PathBuf {
        self.storage.clone()
    }

    fn filesystem(&self) -> &dyn Filesystem {
        &self.fs
    }

    fn call(&self, command: &str) -> Result<(), HostError> {
        match command {
            CLEAR_COMMAND => {
                clear_cache(&self.fs, &self.layout.cache_file).map_err(|source| {
                    HostError::Command { command: command.to_string(), source }
                })?;
                Ok(())
            }
            other => Err(HostError::UnknownCommand(other.to_string())),
        }
    }
}
