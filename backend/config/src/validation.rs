//! Config validation with field paths in every message.

use crate::schema::IdlewatchConfig;
use thiserror::Error;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &IdlewatchConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_telegram(config, &mut report);
    validate_storage(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_telegram(config: &IdlewatchConfig, report: &mut ValidationReport) {
    match config.telegram.token.as_deref() {
        None => report.warn("telegram.token", "No bot token configured; `serve` will refuse to start"),
        Some(token) if !token.contains(':') => {
            report.warn("telegram.token", "Token does not look like a Telegram bot token")
        }
        Some(_) => {}
    }
}

fn validate_storage(config: &IdlewatchConfig, report: &mut ValidationReport) {
    if config.storage.state_dir.as_os_str().is_empty() {
        report.error("storage.stateDir", "State directory must not be empty");
    }
}

fn validate_logging(config: &IdlewatchConfig, report: &mut ValidationReport) {
    // Full filter directives ("idlewatch_store=debug") are allowed.
    let level = config.logging.level.trim();
    if level.is_empty() {
        report.error("logging.level", "Log level must not be empty");
    } else if !level.contains('=') && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        report.warn("logging.level", format!("Unknown log level '{}'", level));
    }
}
