use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use idlewatch_core::{ActivityRecord, ChatId, ChatPlatform, MemberId, WatchResult};
use idlewatch_store::ActivityStore;

use crate::action::ModerationAction;
use crate::engine::{self, RemovalCall};
use crate::report;

/// Store bookkeeping after a successful removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationPolicy {
    /// Drop a member's record after a successful ban. Kicks never evict.
    pub evict_on_ban: bool,
}

/// Result of one removal call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberOutcome {
    Removed {
        member_id: MemberId,
        display_name: String,
    },
    Failed {
        member_id: MemberId,
        display_name: String,
        reason: String,
    },
}

/// Per-member outcomes of a kick or ban sweep, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub action: ModerationAction,
    pub threshold_days: u32,
    pub outcomes: Vec<MemberOutcome>,
}

impl ActionReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn removed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, MemberOutcome::Removed { .. }))
            .count()
    }

    /// One reply line per member, or the empty-selection message.
    pub fn messages(&self) -> Vec<String> {
        if self.outcomes.is_empty() {
            return vec![report::NO_INACTIVE_USERS.to_string()];
        }
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                MemberOutcome::Removed { member_id, display_name } => report::removal_succeeded(
                    display_name,
                    *member_id,
                    self.action,
                    self.threshold_days,
                ),
                MemberOutcome::Failed { member_id, display_name, reason } => {
                    report::removal_failed(display_name, *member_id, self.action, reason)
                }
            })
            .collect()
    }
}

/// Applies kick/ban sweeps through a `ChatPlatform`.
pub struct Moderator {
    store: Arc<ActivityStore>,
    platform: Arc<dyn ChatPlatform>,
    policy: ModerationPolicy,
}

impl Moderator {
    pub fn new(
        store: Arc<ActivityStore>,
        platform: Arc<dyn ChatPlatform>,
        policy: ModerationPolicy,
    ) -> Self {
        Self { store, platform, policy }
    }

    pub fn store(&self) -> &Arc<ActivityStore> {
        &self.store
    }

    /// Members of `chat_id` idle for at least `threshold_days` days.
    pub async fn inactive(
        &self,
        chat_id: ChatId,
        threshold_days: u32,
        now: DateTime<Utc>,
    ) -> Vec<ActivityRecord> {
        let records = self.store.snapshot(chat_id).await;
        engine::select(&records, threshold_days, now)
    }

    /// Remove every inactive member. A failed removal is noted and the
    /// sweep continues with the next member.
    pub async fn enforce(
        &self,
        chat_id: ChatId,
        action: ModerationAction,
        threshold_days: u32,
        now: DateTime<Utc>,
    ) -> WatchResult<ActionReport> {
        let records = self.store.snapshot(chat_id).await;
        let calls = engine::plan(&records, action, threshold_days, now)?;
        info!(chat_id, %action, threshold_days, selected = calls.len(), "Enforcing inactivity sweep");

        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls {
            outcomes.push(self.remove(chat_id, action, call).await);
        }

        Ok(ActionReport {
            action,
            threshold_days,
            outcomes,
        })
    }

    async fn remove(&self, chat_id: ChatId, action: ModerationAction, call: RemovalCall) -> MemberOutcome {
        let RemovalCall { member_id, display_name, lift_at } = call;

        if let Err(e) = self.platform.remove_member(chat_id, member_id, lift_at).await {
            warn!(chat_id, member_id, %action, error = %e, "Removal failed");
            return MemberOutcome::Failed {
                member_id,
                display_name,
                reason: e.to_string(),
            };
        }
        info!(chat_id, member_id, %action, %lift_at, "Member removed");

        if action == ModerationAction::Ban && self.policy.evict_on_ban {
            if let Err(e) = self.store.evict(chat_id, member_id).await {
                warn!(chat_id, member_id, error = %e, "Banned member could not be evicted");
                return MemberOutcome::Failed {
                    member_id,
                    display_name,
                    reason: format!("removed, but record not evicted: {}", e),
                };
            }
        }

        MemberOutcome::Removed { member_id, display_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use idlewatch_core::testing::{FakePlatform, Removal};

    const CHAT: ChatId = -100;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    async fn seeded_store(dir: &std::path::Path) -> Arc<ActivityStore> {
        let store = ActivityStore::load(dir).await.unwrap();
        store.record(CHAT, 1, "A", now() - Duration::days(1)).await.unwrap();
        store.record(CHAT, 3, "C", now() - Duration::days(8)).await.unwrap();
        store.record(CHAT, 4, "D", now() - Duration::days(30)).await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn kick_lifts_immediately_and_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path()).await;
        let platform = Arc::new(FakePlatform::new());
        let moderator = Moderator::new(store.clone(), platform.clone(), ModerationPolicy::default());
        let before = store.snapshot(CHAT).await;

        let report = moderator
            .enforce(CHAT, ModerationAction::Kick, 7, now())
            .await
            .unwrap();

        assert_eq!(
            platform.removals(),
            vec![
                Removal { chat_id: CHAT, user_id: 3, lift_at: now() },
                Removal { chat_id: CHAT, user_id: 4, lift_at: now() },
            ]
        );
        assert_eq!(
            report.messages(),
            vec![
                "C (ID: 3) has been kicked for 7 days.".to_string(),
                "D (ID: 4) has been kicked for 7 days.".to_string(),
            ]
        );
        assert_eq!(store.snapshot(CHAT).await, before);
    }

    #[tokio::test]
    async fn ban_lifts_after_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path()).await;
        let platform = Arc::new(FakePlatform::new());
        let moderator = Moderator::new(store.clone(), platform.clone(), ModerationPolicy::default());

        let report = moderator
            .enforce(CHAT, ModerationAction::Ban, 7, now())
            .await
            .unwrap();

        assert_eq!(report.removed(), 2);
        assert!(platform
            .removals()
            .iter()
            .all(|r| r.lift_at == now() + Duration::days(7)));
        assert_eq!(store.snapshot(CHAT).await.len(), 3);
    }

    #[tokio::test]
    async fn ban_evicts_when_policy_says_so() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path()).await;
        let platform = Arc::new(FakePlatform::new());
        let moderator = Moderator::new(
            store.clone(),
            platform.clone(),
            ModerationPolicy { evict_on_ban: true },
        );

        moderator
            .enforce(CHAT, ModerationAction::Ban, 7, now())
            .await
            .unwrap();

        let remaining: Vec<MemberId> = store.snapshot(CHAT).await.iter().map(|r| r.member_id).collect();
        assert_eq!(remaining, vec![1]);
    }

    #[tokio::test]
    async fn kick_never_evicts_even_with_evict_policy() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path()).await;
        let platform = Arc::new(FakePlatform::new());
        let moderator = Moderator::new(
            store.clone(),
            platform.clone(),
            ModerationPolicy { evict_on_ban: true },
        );

        moderator
            .enforce(CHAT, ModerationAction::Kick, 7, now())
            .await
            .unwrap();
        assert_eq!(store.snapshot(CHAT).await.len(), 3);
    }

    #[tokio::test]
    async fn failed_removal_does_not_stop_the_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path()).await;
        let platform = Arc::new(FakePlatform::new().failing_for(3));
        let moderator = Moderator::new(
            store.clone(),
            platform.clone(),
            ModerationPolicy { evict_on_ban: true },
        );

        let report = moderator
            .enforce(CHAT, ModerationAction::Ban, 7, now())
            .await
            .unwrap();

        assert_eq!(report.removed(), 1);
        assert_eq!(platform.removals().len(), 1);
        let messages = report.messages();
        assert!(messages[0].starts_with("Failed to ban C (ID: 3): "));
        assert_eq!(messages[1], "D (ID: 4) has been banned for 7 days.");
        // The failed member keeps their record.
        let remaining: Vec<MemberId> = store.snapshot(CHAT).await.iter().map(|r| r.member_id).collect();
        assert_eq!(remaining, vec![1, 3]);
    }

    #[tokio::test]
    async fn nothing_selected_reports_no_inactive_users() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path()).await;
        let platform = Arc::new(FakePlatform::new());
        let moderator = Moderator::new(store, platform.clone(), ModerationPolicy::default());

        let report = moderator
            .enforce(CHAT, ModerationAction::Kick, 60, now())
            .await
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.messages(), vec![crate::report::NO_INACTIVE_USERS.to_string()]);
        assert!(platform.removals().is_empty());
    }

    #[tokio::test]
    async fn inactive_reads_current_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path()).await;
        let moderator = Moderator::new(store, Arc::new(FakePlatform::new()), ModerationPolicy::default());

        let selected: Vec<ActivityRecord> = moderator.inactive(CHAT, 7, now()).await;
        assert_eq!(
            selected.iter().map(|r| r.member_id).collect::<Vec<_>>(),
            vec![3, 4]
        );
    }
}
