//! Idlewatch runtime configuration schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration, read from `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdlewatchConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub moderation: ModerationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    /// Bot API token. Left unset, `TELEGRAM_TOKEN` fills it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Count plain text messages as activity, not only media.
    #[serde(default)]
    pub track_text: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Directory holding one `<chat_id>.json` per chat.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { state_dir: default_state_dir() }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationConfig {
    /// Drop a member's activity record after a successful ban.
    #[serde(default)]
    pub evict_on_ban: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for rolling NDJSON logs; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level(), dir: None }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: IdlewatchConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, IdlewatchConfig::default());
        assert_eq!(config.storage.state_dir, PathBuf::from("state"));
        assert_eq!(config.logging.level, "info");
        assert!(!config.moderation.evict_on_ban);
    }

    #[test]
    fn camel_case_keys() {
        let raw = "telegram:\n  trackText: true\nstorage:\n  stateDir: /var/lib/idlewatch\nmoderation:\n  evictOnBan: true\n";
        let config: IdlewatchConfig = serde_yaml::from_str(raw).unwrap();
        assert!(config.telegram.track_text);
        assert!(config.moderation.evict_on_ban);
        assert_eq!(config.storage.state_dir, PathBuf::from("/var/lib/idlewatch"));
    }
}
