//! Settings file discovery and layered loading

use super::{Settings, SettingsOverrides};
use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "CONFIG_CACHE_";

/// Load settings with precedence CLI > Env > File > Defaults.
///
/// An explicitly given settings file must exist; an auto-discovered one is
/// optional.
pub fn load_settings(
    base_path: &Path,
    settings_path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<Settings> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    let file = match settings_path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Settings file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => discover_settings(base_path),
    };

    if let Some(file) = &file {
        tracing::debug!("Loading settings from {}", file.display());
        let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        figment = match ext.as_str() {
            "toml" => figment.merge(Toml::file(file)),
            "yaml" | "yml" => figment.merge(Yaml::file(file)),
            other => anyhow::bail!(
                "Unsupported settings extension '.{}' for file {}",
                other,
                file.display()
            ),
        };
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
        .extract()
        .with_context(|| match &file {
            Some(f) => format!("Invalid settings (file: {})", f.display()),
            None => "Invalid settings".to_string(),
        })
}

fn discover_settings(base_path: &Path) -> Option<PathBuf> {
    let candidates =
        ["config-cache.toml", ".config-cache.toml", "config-cache.yaml", "config-cache.yml"];

    candidates.iter().map(|c| base_path.join(c)).find(|p| p.is_file())
}
