//! Configuration directory scanning

use crate::domain::UnitFormat;
use std::path::Path;

pub mod scanner;

pub use scanner::{ConfigDirScanner, ScanError};

/// Scan `dir` for units of the given format.
pub fn scan_config_dir<P: AsRef<Path>>(
    dir: P,
    format: UnitFormat,
) -> Result<ConfigDirScanner, ScanError> {
    ConfigDirScanner::new(dir.as_ref(), format.marker())
}
