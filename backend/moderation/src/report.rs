//! Operator-facing text for moderation results.

use idlewatch_core::{ActivityRecord, MemberId};

use crate::action::ModerationAction;

pub const NO_INACTIVE_USERS: &str = "No inactive users found.";
pub const LIST_HEADER: &str = "List of inactive users:";

/// `"{name} (ID: {id})"`.
pub fn member_label(display_name: &str, member_id: MemberId) -> String {
    format!("{} (ID: {})", display_name, member_id)
}

/// The `/show` reply: a header plus one line per member, or the
/// distinct empty message when nobody qualifies.
pub fn inactive_list(selected: &[ActivityRecord]) -> String {
    if selected.is_empty() {
        return NO_INACTIVE_USERS.to_string();
    }
    let mut lines = Vec::with_capacity(selected.len() + 1);
    lines.push(LIST_HEADER.to_string());
    lines.extend(
        selected
            .iter()
            .map(|r| member_label(&r.display_name, r.member_id)),
    );
    lines.join("\n")
}

pub fn removal_succeeded(
    display_name: &str,
    member_id: MemberId,
    action: ModerationAction,
    threshold_days: u32,
) -> String {
    format!(
        "{} has been {} for {} days.",
        member_label(display_name, member_id),
        action.past_tense(),
        threshold_days
    )
}

pub fn removal_failed(
    display_name: &str,
    member_id: MemberId,
    action: ModerationAction,
    reason: &str,
) -> String {
    format!(
        "Failed to {} {}: {}",
        action,
        member_label(display_name, member_id),
        reason
    )
}
