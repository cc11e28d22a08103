//! Telegram Group Membership
//!
//! Maps Telegram users and member kinds onto Idlewatch types, and the
//! kick/ban mechanics of the Bot API.

use chrono::{DateTime, Utc};
use teloxide::types::{ChatMemberKind, User, UserId};

use idlewatch_core::{display_name, MemberId, MemberStatus, Sighting, WatchError, WatchResult};

pub fn member_id(user: &User) -> MemberId {
    user.id.0 as MemberId
}

pub fn user_id(member_id: MemberId) -> WatchResult<UserId> {
    u64::try_from(member_id)
        .map(UserId)
        .map_err(|_| WatchError::Platform(format!("{} is not a Telegram user id", member_id)))
}

/// A sighting for `user` at `seen_at`, labelled by username or first name.
pub fn sighting(user: &User, seen_at: DateTime<Utc>) -> Sighting {
    let id = member_id(user);
    Sighting::new(
        id,
        display_name(id, user.username.as_deref(), Some(user.first_name.as_str())),
        seen_at,
    )
}

pub fn member_status(kind: &ChatMemberKind) -> MemberStatus {
    if kind.is_owner() {
        MemberStatus::Owner
    } else if kind.is_administrator() {
        MemberStatus::Administrator
    } else if kind.is_banned() {
        MemberStatus::Banned
    } else if kind.is_left() {
        MemberStatus::Left
    } else if kind.is_restricted() {
        MemberStatus::Restricted
    } else {
        MemberStatus::Member
    }
}

/// Telegram treats bans shorter than 30 seconds as permanent, so a removal
/// that should lift now is done as ban followed by unban.
pub fn is_immediate_lift(lift_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    lift_at <= now
}
