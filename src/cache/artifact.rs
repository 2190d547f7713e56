//! Cached artifact encoding and verification
//!
//! The artifact is a pretty-printed JSON document holding the whole merged
//! map. Loading it back must reproduce the map exactly.

use crate::domain::ConfigMap;
use crate::host::Filesystem;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to encode configuration")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to read cached configuration {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cached configuration {} is not valid", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration '{name}' does not survive a reload")]
    Mismatch { name: String },
}

pub fn encode(config: &ConfigMap) -> Result<String, ArtifactError> {
    let mut text = serde_json::to_string_pretty(config).map_err(ArtifactError::Encode)?;
    text.push('\n');
    Ok(text)
}

pub fn decode(text: &str, path: &Path) -> Result<ConfigMap, ArtifactError> {
    serde_json::from_str(text)
        .map_err(|source| ArtifactError::Decode { path: path.to_path_buf(), source })
}

/// Read and decode the artifact at `path`.
pub fn load_cached(fs: &dyn Filesystem, path: &Path) -> Result<ConfigMap, ArtifactError> {
    let text = fs
        .read_to_string(path)
        .map_err(|source| ArtifactError::Read { path: path.to_path_buf(), source })?;
    decode(&text, path)
}

/// Check that `reloaded` is deeply equal to what was written.
pub fn verify(written: &ConfigMap, reloaded: &ConfigMap) -> Result<(), ArtifactError> {
    for (name, value) in written.iter() {
        if reloaded.get(name) != Some(value) {
            return Err(ArtifactError::Mismatch { name: name.to_string() });
        }
    }
    if let Some(extra) = reloaded.names().find(|name| !written.contains(name)) {
        return Err(ArtifactError::Mismatch { name: extra.to_string() });
    }
    Ok(())
}
