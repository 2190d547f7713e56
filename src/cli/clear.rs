//! `config:clear` command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::GlobalArgs;
use crate::cache::clear_cache;
use crate::config::SettingsOverrides;
use crate::host::{Host, LocalHost};

#[derive(Args)]
pub struct ClearArgs {
    /// Cache file to remove
    #[arg(long, value_name = "FILE")]
    pub cache_file: Option<PathBuf>,
}

pub fn run(args: ClearArgs, global: &GlobalArgs) -> Result<()> {
    let base = global.resolve_base_path()?;
    let overrides = SettingsOverrides { cache_file: args.cache_file, ..SettingsOverrides::default() };
    let settings = global.load_settings(&base, &overrides)?;
    let host = LocalHost::new(&base, &settings);

    let path = &host.layout().cache_file;
    let removed = clear_cache(host.filesystem(), path)
        .with_context(|| format!("Failed to remove {}", path.display()))?;
    if !removed {
        tracing::debug!("No cached configuration at {}", path.display());
    }

    println!("Configuration cache cleared!");
    Ok(())
}
