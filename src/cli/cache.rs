//! `config:cache` command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::GlobalArgs;
use crate::cache::CacheBuilder;
use crate::config::SettingsOverrides;
use crate::domain::UnitFormat;
use crate::host::LocalHost;

#[derive(Args)]
pub struct CacheArgs {
    /// Application configuration directory
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Framework default configuration directory
    #[arg(long, value_name = "DIR")]
    pub framework_config_dir: Option<PathBuf>,

    /// Output cache file
    #[arg(long, value_name = "FILE")]
    pub cache_file: Option<PathBuf>,

    /// Storage directory exposed to configuration files as ${storage_path}
    #[arg(long, value_name = "DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Format of the configuration files
    #[arg(long, value_enum)]
    pub format: Option<UnitFormat>,
}

impl CacheArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config_dir: self.config_dir.clone(),
            framework_config_dir: self.framework_config_dir.clone(),
            cache_file: self.cache_file.clone(),
            storage_dir: self.storage_dir.clone(),
            format: self.format,
        }
    }
}

pub fn run(args: CacheArgs, global: &GlobalArgs) -> Result<()> {
    let base = global.resolve_base_path()?;
    let settings = global.load_settings(&base, &args.overrides())?;
    let host = LocalHost::new(&base, &settings);

    let report = CacheBuilder::new(&host, host.layout()).build()?;
    tracing::debug!(
        "Wrote {} units ({} bytes) to {}",
        report.units,
        report.bytes,
        report.path.display()
    );

    println!("Configuration cached successfully!");
    Ok(())
}
