use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform chat identifier (Telegram group ids are negative).
pub type ChatId = i64;

/// Platform user identifier, unique within a chat.
pub type MemberId = i64;

/// Last-seen bookkeeping for one member of one chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub chat_id: ChatId,
    pub member_id: MemberId,
    pub display_name: String,
    pub last_seen: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn new(
        chat_id: ChatId,
        member_id: MemberId,
        display_name: impl Into<String>,
        last_seen: DateTime<Utc>,
    ) -> Self {
        Self {
            chat_id,
            member_id,
            display_name: display_name.into(),
            last_seen,
        }
    }
}

/// A member observed in a chat, as fed to the activity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub member_id: MemberId,
    pub display_name: String,
    pub seen_at: DateTime<Utc>,
}

impl Sighting {
    pub fn new(member_id: MemberId, display_name: impl Into<String>, seen_at: DateTime<Utc>) -> Self {
        Self {
            member_id,
            display_name: display_name.into(),
            seen_at,
        }
    }
}

/// Pick the best human label for a member: username, then first name, then the id.
pub fn display_name(member_id: MemberId, username: Option<&str>, first_name: Option<&str>) -> String {
    [username, first_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| member_id.to_string())
}

/// A member's standing in a chat, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Owners and administrators may run moderation commands.
    pub fn is_privileged(self) -> bool {
        matches!(self, MemberStatus::Owner | MemberStatus::Administrator)
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberStatus::Owner => "owner",
            MemberStatus::Administrator => "administrator",
            MemberStatus::Member => "member",
            MemberStatus::Restricted => "restricted",
            MemberStatus::Left => "left",
            MemberStatus::Banned => "banned",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_username() {
        assert_eq!(display_name(7, Some("alice"), Some("Alice")), "alice");
    }

    #[test]
    fn display_name_falls_back_to_first_name_then_id() {
        assert_eq!(display_name(7, None, Some("Alice")), "Alice");
        assert_eq!(display_name(7, Some(""), Some("  ")), "7");
        assert_eq!(display_name(42, None, None), "42");
    }

    #[test]
    fn only_owner_and_admin_are_privileged() {
        assert!(MemberStatus::Owner.is_privileged());
        assert!(MemberStatus::Administrator.is_privileged());
        assert!(!MemberStatus::Member.is_privileged());
        assert!(!MemberStatus::Restricted.is_privileged());
        assert!(!MemberStatus::Left.is_privileged());
    }
}
