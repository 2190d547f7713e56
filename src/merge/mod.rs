//! Configuration merging with application-over-framework precedence
//!
//! Units from the primary directory always win. A unit from the secondary
//! directory is only loaded when its name is still free, and it replaces
//! nothing: values are never deep-merged.

use crate::bootstrap::{AppContext, BootstrapError};
use crate::domain::{ConfigMap, Layout, UnitFormat};
use crate::host::Host;
use crate::scan::{scan_config_dir, ScanError};
use std::path::Path;
use thiserror::Error;

pub mod interpolate;
pub mod loader;

pub use loader::{load_unit, LoadError};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Merge `primary` and `secondary` into a single map.
///
/// Any load failure aborts the merge; no partial map is returned.
pub fn merge_configuration(
    primary: &Path,
    secondary: &Path,
    format: UnitFormat,
    ctx: &AppContext,
) -> Result<ConfigMap, MergeError> {
    let mut config = ConfigMap::new();

    for entry in scan_config_dir(primary, format)? {
        let entry = entry?;
        let value = load_unit(&entry, format, ctx)?;
        tracing::debug!("Loaded '{}' from {}", entry.name, entry.path.display());
        config.insert(entry.name, value);
    }

    for entry in scan_config_dir(secondary, format)? {
        let entry = entry?;
        if config.contains(&entry.name) {
            tracing::debug!("Skipping framework default '{}': overridden", entry.name);
            continue;
        }
        let value = load_unit(&entry, format, ctx)?;
        tracing::debug!("Loaded framework default '{}' from {}", entry.name, entry.path.display());
        config.insert(entry.name, value);
    }

    Ok(config)
}

/// Boot a fresh application context and merge the configuration it sees.
pub fn fresh_configuration(host: &dyn Host, layout: &Layout) -> Result<ConfigMap, MergeError> {
    let mut ctx = AppContext::bootstrap(&layout.bootstrap_descriptor, &host.base_path(""))?;
    ctx.use_storage_path(host.storage_path());

    merge_configuration(&layout.config_dir, &layout.framework_config_dir, layout.format, &ctx)
}
