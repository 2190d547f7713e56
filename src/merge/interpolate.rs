//! `${...}` placeholder expansion in configuration documents

use crate::bootstrap::AppContext;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use thiserror::Error;

// `$${name}` is an escaped literal, `${name}` a placeholder.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([^}]*)\}").expect("valid placeholder regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("Unknown placeholder '${{{0}}}'")]
    Unknown(String),

    #[error("Environment variable '{0}' is not set and has no default")]
    MissingEnv(String),
}

/// Expand placeholders in every string scalar of `value`, recursively.
///
/// Mapping keys are left untouched.
pub fn expand_value(value: &mut Value, ctx: &AppContext) -> Result<(), InterpolationError> {
    match value {
        Value::String(s) => {
            if s.contains("${") {
                *s = expand_str(s, ctx)?;
            }
        }
        Value::Sequence(items) => {
            for item in items {
                expand_value(item, ctx)?;
            }
        }
        Value::Mapping(map) => {
            for item in map.values_mut() {
                expand_value(item, ctx)?;
            }
        }
        Value::Tagged(tagged) => expand_value(&mut tagged.value, ctx)?,
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
    Ok(())
}

pub fn expand_str(input: &str, ctx: &AppContext) -> Result<String, InterpolationError> {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&input[last..whole.start()]);

        let key = caps.get(2).map_or("", |m| m.as_str());
        if caps.get(1).is_some() {
            out.push_str("${");
            out.push_str(key);
            out.push('}');
        } else {
            out.push_str(&resolve(key.trim(), ctx)?);
        }
        last = whole.end();
    }

    out.push_str(&input[last..]);
    Ok(out)
}

fn resolve(key: &str, ctx: &AppContext) -> Result<String, InterpolationError> {
    match key {
        "base_path" => Ok(ctx.base_path().display().to_string()),
        "storage_path" => Ok(ctx.storage_path().display().to_string()),
        "app_name" => Ok(ctx.name().to_string()),
        "app_env" => Ok(ctx.env().to_string()),
        _ => match key.strip_prefix("env:") {
            Some(spec) => resolve_env(spec),
            None => Err(InterpolationError::Unknown(key.to_string())),
        },
    }
}

fn resolve_env(spec: &str) -> Result<String, InterpolationError> {
    let (name, default) = match spec.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (spec, None),
    };

    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => default
            .map(str::to_string)
            .ok_or_else(|| InterpolationError::MissingEnv(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::AppDescriptor;
    use std::path::Path;

    fn ctx() -> AppContext {
        let descriptor = AppDescriptor {
            name: Some("shop".to_string()),
            env: Some("staging".to_string()),
            storage: None,
        };
        let mut ctx = AppContext::from_descriptor(descriptor, Path::new("/srv/shop"));
        ctx.use_storage_path("/var/shop");
        ctx
    }

    #[test]
    fn test_expands_context_placeholders() {
        let out = expand_str("${storage_path}/logs/${app_name}-${app_env}.log", &ctx()).unwrap();
        assert_eq!(out, "/var/shop/logs/shop-staging.log");
    }

    #[test]
    fn test_plain_string_unchanged() {
        assert_eq!(expand_str("no placeholders here", &ctx()).unwrap(), "no placeholders here");
    }

    #[test]
    fn test_escaped_placeholder_is_literal() {
        assert_eq!(expand_str("$${storage_path}", &ctx()).unwrap(), "${storage_path}");
    }

    #[test]
    fn test_unknown_placeholder_errors() {
        let err = expand_str("${nope}", &ctx()).unwrap_err();
        assert_eq!(err, InterpolationError::Unknown("nope".to_string()));
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let out =
            expand_str("${env:CONFIG_CACHE_TEST_UNSET_VAR:-fallback}", &ctx()).unwrap();
        assert_eq!(out, "fallback");
    }

    #[test]
    fn test_env_placeholder_missing_without_default() {
        let err = expand_str("${env:CONFIG_CACHE_TEST_UNSET_VAR_2}", &ctx()).unwrap_err();
        assert_eq!(err, InterpolationError::MissingEnv("CONFIG_CACHE_TEST_UNSET_VAR_2".into()));
    }

    #[test]
    fn test_env_placeholder_reads_environment() {
        std::env::set_var("CONFIG_CACHE_TEST_SET_VAR", "from-env");
        let out = expand_str("${env:CONFIG_CACHE_TEST_SET_VAR:-ignored}", &ctx()).unwrap();
        assert_eq!(out, "from-env");
    }

    #[test]
    fn test_expand_value_recurses_but_skips_keys() {
        let mut value: Value = serde_yaml::from_str(
            "${app_name}: keep\npaths:\n  - ${base_path}/a\n  - 3\nnested:\n  dir: ${storage_path}\n",
        )
        .unwrap();
        expand_value(&mut value, &ctx()).unwrap();

        assert_eq!(value["${app_name}"], Value::from("keep"));
        assert_eq!(value["paths"][0], Value::from("/srv/shop/a"));
        assert_eq!(value["paths"][1], Value::from(3));
        assert_eq!(value["nested"]["dir"], Value::from("/var/shop"));
    }
}
