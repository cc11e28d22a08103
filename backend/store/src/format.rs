//! On-disk encoding of one chat's roster.
//!
//! Each chat lives in its own `<chat_id>.json`, an object keyed by member id:
//!
//! ```json
//! { "12345": { "date": "2024-03-01T12:00:00Z", "username": "alice" } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

use idlewatch_core::{MemberId, WatchError, WatchResult};

/// In-memory value for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub display_name: String,
    pub last_seen: DateTime<Utc>,
}

/// One chat's members, ordered by id.
pub type Roster = BTreeMap<MemberId, Entry>;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredEntry {
    date: String,
    username: String,
}

/// Drop sub-second precision; stored timestamps are whole seconds.
pub fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0).unwrap_or(ts)
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Accepts RFC 3339, or a naive ISO-8601 datetime taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
        })
        .ok()?;
    Some(truncate_to_seconds(parsed))
}

pub fn encode(roster: &Roster) -> serde_json::Result<String> {
    let stored: BTreeMap<String, StoredEntry> = roster
        .iter()
        .map(|(id, entry)| {
            (
                id.to_string(),
                StoredEntry {
                    date: format_timestamp(entry.last_seen),
                    username: entry.display_name.clone(),
                },
            )
        })
        .collect();
    serde_json::to_string_pretty(&stored)
}

/// Decode a roster file. Anything that is not exactly the expected shape is
/// rejected rather than skipped.
pub fn decode(path: &Path, raw: &str) -> WatchResult<Roster> {
    let stored: BTreeMap<String, StoredEntry> =
        serde_json::from_str(raw).map_err(|e| WatchError::corrupt(path, e.to_string()))?;

    let mut roster = Roster::new();
    for (key, item) in stored {
        let member_id = parse_id(&key)
            .ok_or_else(|| WatchError::corrupt(path, format!("invalid member id {:?}", key)))?;
        let last_seen = parse_timestamp(&item.date).ok_or_else(|| {
            WatchError::corrupt(path, format!("invalid date {:?} for member {}", item.date, key))
        })?;
        roster.insert(
            member_id,
            Entry {
                display_name: item.username,
                last_seen,
            },
        );
    }
    Ok(roster)
}

/// Parse an id only in its canonical decimal form ("42", "-100"), so that
/// encoding the parsed value reproduces the key.
pub fn parse_id(raw: &str) -> Option<i64> {
    let id = raw.parse::<i64>().ok()?;
    (id.to_string() == raw).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn path() -> &'static Path {
        Path::new("42.json")
    }

    #[test]
    fn encodes_member_mapping() {
        let mut roster = Roster::new();
        roster.insert(
            7,
            Entry {
                display_name: "alice".into(),
                last_seen: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            },
        );
        let json: serde_json::Value = serde_json::from_str(&encode(&roster).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "7": { "date": "2024-03-01T12:00:00Z", "username": "alice" } })
        );
    }

    #[test]
    fn reads_naive_iso_dates_as_utc_and_truncates() {
        let raw = r#"{ "7": { "date": "2024-03-01T12:00:00.123456", "username": "alice" } }"#;
        let roster = decode(path(), raw).unwrap();
        assert_eq!(
            roster[&7].last_seen,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn reads_offset_dates() {
        let raw = r#"{ "7": { "date": "2024-03-01T14:00:00+02:00", "username": "alice" } }"#;
        let roster = decode(path(), raw).unwrap();
        assert_eq!(
            roster[&7].last_seen,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_content() {
        let cases = [
            "",
            "[]",
            r#"{ "7": "alice" }"#,
            r#"{ "x": { "date": "2024-03-01T12:00:00Z", "username": "a" } }"#,
            r#"{ "+7": { "date": "2024-03-01T12:00:00Z", "username": "a" } }"#,
            r#"{ "7": { "date": "yesterday", "username": "a" } }"#,
            r#"{ "7": { "date": "2024-03-01T12:00:00Z", "username": 5 } }"#,
            r#"{ "7": { "date": "2024-03-01T12:00:00Z" } }"#,
            r#"{ "7": { "date": "2024-03-01T12:00:00Z", "username": "a", "extra": 1 } }"#,
        ];
        for raw in cases {
            let err = decode(path(), raw).unwrap_err();
            assert!(
                matches!(err, WatchError::CorruptState { .. }),
                "expected corrupt state for {:?}, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn canonical_ids_only() {
        assert_eq!(parse_id("-1001"), Some(-1001));
        assert_eq!(parse_id("007"), None);
        assert_eq!(parse_id(""), None);
    }
}
