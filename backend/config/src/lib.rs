//! `idlewatch-config` — Idlewatch runtime configuration.
//!
//! Provides:
//! - Typed config schema
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution and well-known env overrides
//! - Validation with per-field messages

pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{IdlewatchConfig, LoggingConfig, ModerationConfig, StorageConfig, TelegramConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, substitute env vars, apply env overrides, validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<IdlewatchConfig> {
    let env: HashMap<String, String> = std::env::vars().collect();
    prepare(load_config(path).await?, &env)
}

/// The post-load pipeline, with an explicit environment.
pub fn prepare(raw_config: IdlewatchConfig, env: &HashMap<String, String>) -> Result<IdlewatchConfig> {
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: IdlewatchConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    let config = apply_env_overrides(config, env);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("{} config error(s); first: {}", report.errors.len(), report.errors[0]);
    }

    Ok(config)
}
