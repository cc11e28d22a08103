//! CLI Serve Command
//!
//! Wires the store, moderation, commands and the Telegram adapter together.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use idlewatch_channels::{ChannelAdapter, TelegramAdapter, TelegramPlatform, TrackingPolicy};
use idlewatch_config::IdlewatchConfig;
use idlewatch_core::ChatPlatform;
use idlewatch_moderation::{ModerationPolicy, Moderator};
use idlewatch_store::ActivityStore;

pub async fn run(config: IdlewatchConfig) -> Result<()> {
    let token = config
        .telegram
        .token
        .clone()
        .context("No Telegram bot token: set telegram.token or TELEGRAM_TOKEN")?;

    let store = Arc::new(
        ActivityStore::load(&config.storage.state_dir)
            .await
            .context("Failed to load activity state")?,
    );
    info!(
        state_dir = %config.storage.state_dir.display(),
        chats = store.chats().await.len(),
        evict_on_ban = config.moderation.evict_on_ban,
        "Starting Idlewatch"
    );

    let platform = TelegramPlatform::from_token(token);
    let username = platform
        .username()
        .await
        .context("Failed to fetch bot identity")?;
    info!(username = username.as_deref().unwrap_or("<none>"), "Connected to Telegram");
    let shared: Arc<dyn ChatPlatform> = Arc::new(platform.clone());

    let moderator = Arc::new(Moderator::new(
        Arc::clone(&store),
        Arc::clone(&shared),
        ModerationPolicy {
            evict_on_ban: config.moderation.evict_on_ban,
        },
    ));
    let dispatcher = Arc::new(
        idlewatch_commands::build_dispatcher(moderator, shared).with_bot_username(username),
    );

    let adapter = TelegramAdapter::new(
        platform,
        store,
        dispatcher,
        TrackingPolicy {
            track_text: config.telegram.track_text,
        },
    );
    info!(adapter = adapter.name(), "Channel adapter ready");
    adapter.start().await
}
