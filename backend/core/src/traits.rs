use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::WatchResult;
use crate::types::{ChatId, MemberId, MemberStatus};

/// Capabilities Idlewatch needs from the hosting chat platform.
///
/// Implementations own transport concerns (retries, rate limits); callers
/// treat every error as scoped to the single call that produced it.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Look up a user's standing in a chat.
    async fn member_status(&self, chat_id: ChatId, user_id: MemberId) -> WatchResult<MemberStatus>;

    /// Remove a user until `lift_at`. A `lift_at` at or before now means an
    /// immediate kick the user may rejoin from.
    async fn remove_member(
        &self,
        chat_id: ChatId,
        user_id: MemberId,
        lift_at: DateTime<Utc>,
    ) -> WatchResult<()>;

    /// Deliver a text message to a chat.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> WatchResult<()>;
}
