//! Lazy directory scanner for configuration units

use crate::domain::ConfigEntry;
use std::fs::{self, ReadDir};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read configuration directory {}", dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Iterator over the configuration units of a single directory.
///
/// Yields entries in the order the filesystem returns them. A fresh scanner
/// re-reads the directory; an exhausted one stays exhausted.
#[derive(Debug)]
pub struct ConfigDirScanner {
    dir: PathBuf,
    marker: String,
    entries: Option<ReadDir>,
}

impl ConfigDirScanner {
    /// Open `dir` for scanning. A missing directory produces an empty scanner.
    pub fn new(dir: impl Into<PathBuf>, marker: impl Into<String>) -> Result<Self, ScanError> {
        let dir = dir.into();
        let entries = if dir.is_dir() {
            let read = fs::read_dir(&dir)
                .map_err(|source| ScanError::ReadDir { dir: dir.clone(), source })?;
            Some(read)
        } else {
            tracing::debug!("Configuration directory {} not found, skipping", dir.display());
            None
        };
        Ok(Self { dir, marker: marker.into(), entries })
    }

}

impl Iterator for ConfigDirScanner {
    type Item = Result<ConfigEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries.as_mut()?;
        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(e) => e,
                Err(source) => {
                    return Some(Err(ScanError::ReadDir { dir: self.dir.clone(), source }));
                }
            };

            let os_name = entry.file_name();
            if !os_name.to_string_lossy().contains(self.marker.as_str()) {
                continue;
            }
            let Some(file_name) = os_name.to_str() else {
                tracing::warn!(
                    "Skipping non UTF-8 file name {} in {}",
                    os_name.to_string_lossy(),
                    self.dir.display()
                );
                continue;
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = unit_name(file_name, &self.marker);
            return Some(Ok(ConfigEntry { name, path }));
        }
        self.entries = None;
        None
    }
}

/// Derive a unit name by removing the first occurrence of `marker`.
pub fn unit_name(file_name: &str, marker: &str) -> String {
    file_name.replacen(marker, "", 1)
}
