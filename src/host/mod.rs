//! Host application collaborators
//!
//! The cache builder never reaches for ambient state. Path resolution,
//! filesystem access and invoking sibling commands all go through [`Host`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub mod fs;
pub mod local;

pub use fs::{Filesystem, LocalFs};
pub use local::LocalHost;

/// Name of the command that removes a previously cached artifact.
pub const CLEAR_COMMAND: &str = "config:clear";

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Command '{command}' failed")]
    Command {
        command: String,
        #[source]
        source: io::Error,
    },
}

pub trait Host {
    /// Absolute path for `relative` under the application base path.
    /// An empty string yields the base path itself.
    fn base_path(&self, relative: &str) -> PathBuf;

    fn storage_path(&self) -> PathBuf;

    fn filesystem(&self) -> &dyn Filesystem;

    /// Run another command by name.
    fn call(&self, command: &str) -> Result<(), HostError>;
}
