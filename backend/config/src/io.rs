//! Config file read/write with atomic backup rotation.

use crate::schema::IdlewatchConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Number of rolling backups to keep.
const MAX_BACKUPS: usize = 3;

/// Resolve the Idlewatch config directory.
/// Priority: `IDLEWATCH_CONFIG_DIR` env > `~/.idlewatch/` > `./.idlewatch`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("IDLEWATCH_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".idlewatch"),
        None => PathBuf::from(".idlewatch"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<IdlewatchConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(IdlewatchConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file is a valid "all defaults" config.
    if raw.trim().is_empty() {
        return Ok(IdlewatchConfig::default());
    }

    let config: IdlewatchConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write config to disk atomically (write to temp file, rename).
///
/// Creates a rolling backup of the previous config before overwriting.
pub async fn write_config(config: &IdlewatchConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    if path.exists() {
        rotate_backups(path).await;
    }

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path).await.with_context(|| {
        format!("Failed to rename temp config to: {}", path.display())
    })?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

/// Shift `config.yaml.bak.N` up by one (the oldest falls off), then copy the
/// current file to `.bak.1`. Failures are logged and never block the write.
async fn rotate_backups(path: &Path) {
    let backup = |n: usize| path.with_extension(format!("yaml.bak.{n}"));

    for n in (1..MAX_BACKUPS).rev() {
        match fs::rename(backup(n), backup(n + 1)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                warn!(backup = n, error = %e, "Failed to rotate config backup");
            }
            _ => {}
        }
    }
    if let Err(e) = fs::copy(path, backup(1)).await {
        warn!(error = %e, "Failed to back up config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.yaml")).await.unwrap();
        assert_eq!(config, IdlewatchConfig::default());
    }

    #[tokio::test]
    async fn write_then_load_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());

        let mut config = IdlewatchConfig::default();
        config.moderation.evict_on_ban = true;
        write_config(&config, &path).await.unwrap();
        assert_eq!(load_config(&path).await.unwrap(), config);

        config.telegram.track_text = true;
        write_config(&config, &path).await.unwrap();
        assert!(path.with_extension("yaml.bak.1").exists());
        assert_eq!(load_config(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn backups_keep_the_last_three_state_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());

        for n in 1..=5 {
            let mut config = IdlewatchConfig::default();
            config.storage.state_dir = format!("state-{n}").into();
            write_config(&config, &path).await.unwrap();
        }

        let state_dir = |p: PathBuf| {
            let raw = std::fs::read_to_string(p).unwrap();
            serde_yaml::from_str::<IdlewatchConfig>(&raw).unwrap().storage.state_dir
        };
        assert_eq!(state_dir(path.clone()), PathBuf::from("state-5"));
        assert_eq!(state_dir(path.with_extension("yaml.bak.1")), PathBuf::from("state-4"));
        assert_eq!(state_dir(path.with_extension("yaml.bak.2")), PathBuf::from("state-3"));
        assert_eq!(state_dir(path.with_extension("yaml.bak.3")), PathBuf::from("state-2"));
        assert!(!path.with_extension("yaml.bak.4").exists());
    }

    #[tokio::test]
    async fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "storage: [not, a, map]").unwrap();
        assert!(load_config(&path).await.is_err());
    }
}
