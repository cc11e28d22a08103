//! Environment variable handling for config values.
//!
//! String values may reference `${VAR_NAME}` (uppercase `[A-Z_][A-Z0-9_]*`),
//! resolved at load time. `$${VAR}` escapes to a literal `${VAR}`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::schema::IdlewatchConfig;

/// Matches `${VAR}` and its escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Token variable read when the config leaves `telegram.token` unset.
pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Overrides `storage.stateDir`.
pub const STATE_DIR_VAR: &str = "IDLEWATCH_STATE_DIR";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree from `env`.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute_value(value, env, "")?)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let whole = caps.get(0).expect("group 0 always matches");
        let name = &caps[1];
        out.push_str(&s[last..whole.start()]);
        if whole.as_str().starts_with("$$") {
            out.push_str(&format!("${{{}}}", name));
        } else {
            match env.get(name) {
                Some(val) if !val.is_empty() => out.push_str(val),
                _ => {
                    return Err(MissingEnvVarError {
                        var_name: name.to_string(),
                        config_path: path.to_string(),
                    })
                }
            }
        }
        last = whole.end();
    }
    out.push_str(&s[last..]);
    Ok(out)
}

/// Fill gaps from well-known variables: the token from `TELEGRAM_TOKEN` when
/// the file sets none, and the state dir from `IDLEWATCH_STATE_DIR`.
pub fn apply_env_overrides(mut config: IdlewatchConfig, env: &HashMap<String, String>) -> IdlewatchConfig {
    if config.telegram.token.is_none() {
        config.telegram.token = env.get(TOKEN_VAR).filter(|t| !t.is_empty()).cloned();
    }
    if let Some(dir) = env.get(STATE_DIR_VAR).filter(|d| !d.is_empty()) {
        config.storage.state_dir = PathBuf::from(dir);
    }
    config
}
