//! Pure inactivity selection and removal planning.
//!
//! Nothing here touches the store or the network: callers pass a snapshot
//! and a clock reading and get back what should happen.

use chrono::{DateTime, TimeDelta, Utc};

use idlewatch_core::{ActivityRecord, MemberId, WatchError, WatchResult};

use crate::action::ModerationAction;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days since `last_seen`, floored. Negative when `last_seen` is in the future.
pub fn inactive_days(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last_seen).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Every record idle for at least `threshold_days` full days, ordered by member id.
pub fn select(
    records: &[ActivityRecord],
    threshold_days: u32,
    now: DateTime<Utc>,
) -> Vec<ActivityRecord> {
    let mut selected: Vec<ActivityRecord> = records
        .iter()
        .filter(|r| inactive_days(r.last_seen, now) >= i64::from(threshold_days))
        .cloned()
        .collect();
    selected.sort_by_key(|r| (r.member_id, r.chat_id));
    selected
}

/// One platform removal to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalCall {
    pub member_id: MemberId,
    pub display_name: String,
    pub lift_at: DateTime<Utc>,
}

/// When a removal should be lifted: now for a kick, `threshold_days` ahead for a ban.
pub fn lift_at(
    action: ModerationAction,
    threshold_days: u32,
    now: DateTime<Utc>,
) -> WatchResult<DateTime<Utc>> {
    match action {
        ModerationAction::Kick => Ok(now),
        ModerationAction::Ban => TimeDelta::try_days(i64::from(threshold_days))
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| {
                WatchError::Validation(format!("ban of {} days is out of range", threshold_days))
            }),
    }
}

/// Select inactive records and map each to the removal call for `action`.
pub fn plan(
    records: &[ActivityRecord],
    action: ModerationAction,
    threshold_days: u32,
    now: DateTime<Utc>,
) -> WatchResult<Vec<RemovalCall>> {
    let lift_at = lift_at(action, threshold_days, now)?;
    Ok(select(records, threshold_days, now)
        .into_iter()
        .map(|r| RemovalCall {
            member_id: r.member_id,
            display_name: r.display_name,
            lift_at,
        })
        .collect())
}
