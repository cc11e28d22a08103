use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use idlewatch_core::WatchError;

/// What to do with members past the inactivity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    /// Remove with an immediate lift; the member may rejoin.
    Kick,
    /// Remove until `threshold_days` from now.
    Ban,
}

impl ModerationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ModerationAction::Kick => "kick",
            ModerationAction::Ban => "ban",
        }
    }

    /// Past tense used in per-member reports.
    pub fn past_tense(self) -> &'static str {
        match self {
            ModerationAction::Kick => "kicked",
            ModerationAction::Ban => "banned",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationAction {
    type Err = WatchError;

    /// Exact, case-sensitive match on `kick` or `ban`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kick" => Ok(ModerationAction::Kick),
            "ban" => Ok(ModerationAction::Ban),
            other => Err(WatchError::Validation(format!(
                "unknown action {:?}, expected ban or kick",
                other
            ))),
        }
    }
}
