//! Loading a single configuration unit

use super::interpolate::{expand_value, InterpolationError};
use crate::bootstrap::AppContext;
use crate::domain::{ConfigEntry, UnitFormat};
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed reading configuration file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid {format} in configuration file: {}", path.display())]
    Parse {
        path: PathBuf,
        format: UnitFormat,
        #[source]
        source: ParseError,
    },

    #[error("Failed to expand placeholders in configuration file: {}", path.display())]
    Interpolate {
        path: PathBuf,
        #[source]
        source: InterpolationError,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Parse one document into a generic structured value.
pub fn parse_unit(content: &str, format: UnitFormat) -> Result<Value, ParseError> {
    let value = match format {
        UnitFormat::Toml => from_toml(toml::from_str(content)?),
        UnitFormat::Yaml => serde_yaml::from_str(content)?,
        UnitFormat::Json => serde_json::from_str(content)?,
    };
    Ok(value)
}

// Datetimes become their TOML text form rather than the crate's wrapper table.
fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table.into_iter().map(|(k, v)| (Value::String(k), from_toml(v))).collect(),
        ),
    }
}

/// Read, parse and expand the unit behind `entry`.
pub fn load_unit(
    entry: &ConfigEntry,
    format: UnitFormat,
    ctx: &AppContext,
) -> Result<Value, LoadError> {
    let content = fs::read_to_string(&entry.path)
        .map_err(|source| LoadError::Read { path: entry.path.clone(), source })?;

    let mut value = parse_unit(&content, format)
        .map_err(|source| LoadError::Parse { path: entry.path.clone(), format, source })?;

    expand_value(&mut value, ctx)
        .map_err(|source| LoadError::Interpolate { path: entry.path.clone(), source })?;

    Ok(value)
}
