//! Core data types shared by the scanner, merger and cache writer.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::PathBuf;

/// On-disk format of a configuration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnitFormat {
    #[default]
    Toml,
    Yaml,
    Json,
}

impl UnitFormat {
    /// Substring a file name must contain to be picked up by the scanner.
    pub fn marker(self) -> &'static str {
        match self {
            UnitFormat::Toml => ".toml",
            UnitFormat::Yaml => ".yaml",
            UnitFormat::Json => ".json",
        }
    }
}

impl fmt::Display for UnitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitFormat::Toml => "toml",
            UnitFormat::Yaml => "yaml",
            UnitFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// A configuration unit found in a directory, not yet loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Merged configuration: unit name to loaded document.
///
/// Keys are unique and kept in insertion order. Values are arbitrary
/// structured documents (mappings, sequences and scalars).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMap {
    entries: Mapping,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Insert a unit, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(Value::String(name.into()), value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().filter_map(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().filter_map(|(k, v)| k.as_str().map(|name| (name, v)))
    }
}

impl FromIterator<(String, Value)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = ConfigMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Resolved absolute locations used by one cache build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub config_dir: PathBuf,
    pub framework_config_dir: PathBuf,
    pub bootstrap_descriptor: PathBuf,
    pub cache_file: PathBuf,
    pub format: UnitFormat,
}
