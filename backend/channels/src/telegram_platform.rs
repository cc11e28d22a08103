use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use tracing::{debug, info};

use idlewatch_core::{ChatPlatform, MemberId, MemberStatus, WatchError, WatchResult};
use idlewatch_logging::redact_sensitive_data;

use crate::telegram_groups;

/// `ChatPlatform` over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Bot::new(token))
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// The bot's own `@username`, used to tell which `/cmd@Name` are ours.
    pub async fn username(&self) -> WatchResult<Option<String>> {
        let me = self.bot.get_me().await.map_err(platform_error)?;
        Ok(me.user.username.clone())
    }
}

fn platform_error(e: teloxide::RequestError) -> WatchError {
    WatchError::Platform(redact_sensitive_data(&e.to_string()))
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn member_status(&self, chat_id: i64, user_id: MemberId) -> WatchResult<MemberStatus> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), telegram_groups::user_id(user_id)?)
            .await
            .map_err(platform_error)?;
        let status = telegram_groups::member_status(&member.kind);
        debug!(chat_id, user_id, %status, "Fetched member status");
        Ok(status)
    }

    async fn remove_member(
        &self,
        chat_id: i64,
        user_id: MemberId,
        lift_at: DateTime<Utc>,
    ) -> WatchResult<()> {
        let user = telegram_groups::user_id(user_id)?;
        let chat = ChatId(chat_id);

        if telegram_groups::is_immediate_lift(lift_at, Utc::now()) {
            self.bot.ban_chat_member(chat, user).await.map_err(platform_error)?;
            self.bot
                .unban_chat_member(chat, user)
                .only_if_banned(true)
                .await
                .map_err(platform_error)?;
            info!(chat_id, user_id, "Kicked member");
        } else {
            self.bot
                .ban_chat_member(chat, user)
                .until_date(lift_at)
                .await
                .map_err(platform_error)?;
            info!(chat_id, user_id, %lift_at, "Banned member");
        }
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> WatchResult<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(platform_error)?;
        Ok(())
    }
}
