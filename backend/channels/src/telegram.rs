use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

use idlewatch_commands::{CommandContext, CommandDispatcher};
use idlewatch_core::{ChatPlatform, Sighting};
use idlewatch_store::ActivityStore;

use crate::telegram_groups;
use crate::telegram_media::{ContentKind, TrackingPolicy};
use crate::telegram_platform::TelegramPlatform;
use crate::ChannelAdapter;

/// Everything an inbound update handler needs.
struct Runtime {
    store: Arc<ActivityStore>,
    dispatcher: Arc<CommandDispatcher>,
    platform: TelegramPlatform,
    policy: TrackingPolicy,
}

pub struct TelegramAdapter {
    runtime: Arc<Runtime>,
}

impl TelegramAdapter {
    pub fn new(
        platform: TelegramPlatform,
        store: Arc<ActivityStore>,
        dispatcher: Arc<CommandDispatcher>,
        policy: TrackingPolicy,
    ) -> Self {
        Self {
            runtime: Arc::new(Runtime { store, dispatcher, platform, policy }),
        }
    }
}

#[async_trait]
impl ChannelAdapter for TelegramAdapter {
    fn name(&self) -> &str { "telegram" }

    async fn start(&self) -> anyhow::Result<()> {
        info!(track_text = self.runtime.policy.track_text, "Starting Telegram adapter");

        let bot = self.runtime.platform.bot().clone();
        let handler = Update::filter_message().endpoint(
            |msg: Message, runtime: Arc<Runtime>| async move {
                runtime.handle_message(&msg).await;
                respond(())
            },
        );

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![Arc::clone(&self.runtime)])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram adapter stopped");
        Ok(())
    }
}

impl Runtime {
    async fn handle_message(&self, msg: &Message) {
        let chat_id = msg.chat.id.0;
        let now = Utc::now();

        if let Some(members) = msg.new_chat_members() {
            let sightings: Vec<Sighting> = members
                .iter()
                .filter(|user| !user.is_bot)
                .map(|user| telegram_groups::sighting(user, now))
                .collect();
            match self.store.record_batch(chat_id, &sightings).await {
                Ok(()) => info!(chat_id, joined = sightings.len(), "Recorded new members"),
                Err(e) => error!(chat_id, error = %e, "Failed to record new members"),
            }
            return;
        }

        let Some(sender) = msg.from.as_ref() else { return };
        let kind = ContentKind::of(msg);

        if kind == ContentKind::Command {
            let text = msg.text().unwrap_or_default();
            let ctx = CommandContext {
                chat_id,
                sender_id: telegram_groups::member_id(sender),
                now,
            };
            match self.dispatcher.handle_text(&ctx, text).await {
                Some(Ok(response)) => self.reply(chat_id, &response.messages).await,
                Some(Err(e)) => {
                    error!(chat_id, error = %e, "Command failed");
                    self.reply(chat_id, &["Command failed; see logs.".to_string()]).await;
                }
                None => debug!(chat_id, "Ignoring unknown command"),
            }
            return;
        }

        if sender.is_bot || !self.policy.qualifies(kind) {
            return;
        }
        let sighting = telegram_groups::sighting(sender, now);
        if let Err(e) = self
            .store
            .record(chat_id, sighting.member_id, &sighting.display_name, sighting.seen_at)
            .await
        {
            error!(chat_id, member_id = sighting.member_id, error = %e, "Failed to record activity");
        }
    }

    async fn reply(&self, chat_id: i64, messages: &[String]) {
        for text in messages {
            if let Err(e) = self.platform.send_message(chat_id, text).await {
                warn!(chat_id, error = %e, "Failed to deliver reply");
            }
        }
    }
}
