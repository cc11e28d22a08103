//! In-memory `ChatPlatform` for tests in downstream crates.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{WatchError, WatchResult};
use crate::traits::ChatPlatform;
use crate::types::{ChatId, MemberId, MemberStatus};

/// A removal the fake platform was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub chat_id: ChatId,
    pub user_id: MemberId,
    pub lift_at: DateTime<Utc>,
}

/// Records every call; statuses default to `Member`.
#[derive(Default)]
pub struct FakePlatform {
    statuses: Mutex<HashMap<(ChatId, MemberId), MemberStatus>>,
    failing_removals: Mutex<HashSet<MemberId>>,
    failing_statuses: Mutex<HashSet<MemberId>>,
    removals: Mutex<Vec<Removal>>,
    sent: Mutex<Vec<(ChatId, String)>>,
    status_lookups: Mutex<usize>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, chat_id: ChatId, user_id: MemberId, status: MemberStatus) -> Self {
        self.statuses.lock().unwrap().insert((chat_id, user_id), status);
        self
    }

    /// Make `remove_member` fail for this user.
    pub fn failing_for(self, user_id: MemberId) -> Self {
        self.failing_removals.lock().unwrap().insert(user_id);
        self
    }

    /// Make `member_status` fail for this user.
    pub fn failing_status_for(self, user_id: MemberId) -> Self {
        self.failing_statuses.lock().unwrap().insert(user_id);
        self
    }

    pub fn removals(&self) -> Vec<Removal> {
        self.removals.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn status_lookups(&self) -> usize {
        *self.status_lookups.lock().unwrap()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn member_status(&self, chat_id: ChatId, user_id: MemberId) -> WatchResult<MemberStatus> {
        *self.status_lookups.lock().unwrap() += 1;
        if self.failing_statuses.lock().unwrap().contains(&user_id) {
            return Err(WatchError::Platform(format!("no status for user {}", user_id)));
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(&(chat_id, user_id))
            .copied()
            .unwrap_or(MemberStatus::Member))
    }

    async fn remove_member(
        &self,
        chat_id: ChatId,
        user_id: MemberId,
        lift_at: DateTime<Utc>,
    ) -> WatchResult<()> {
        if self.failing_removals.lock().unwrap().contains(&user_id) {
            return Err(WatchError::Platform(format!("cannot remove user {}", user_id)));
        }
        self.removals.lock().unwrap().push(Removal { chat_id, user_id, lift_at });
        Ok(())
    }

    async fn send_message(&self, chat_id: ChatId, text: &str) -> WatchResult<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}
