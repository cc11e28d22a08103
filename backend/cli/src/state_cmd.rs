//! CLI State Commands
//!
//! Offline views over the state directory; nothing here talks to Telegram.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use idlewatch_config::IdlewatchConfig;
use idlewatch_core::ChatId;
use idlewatch_moderation::{engine, report};
use idlewatch_store::ActivityStore;

async fn open(config: &IdlewatchConfig) -> Result<ActivityStore> {
    ActivityStore::load(&config.storage.state_dir)
        .await
        .with_context(|| format!("Failed to load state from {}", config.storage.state_dir.display()))
}

pub async fn inactive(config: &IdlewatchConfig, chat_id: ChatId, days: u32) -> Result<()> {
    let store = open(config).await?;
    println!("{}", render_inactive(&store, chat_id, days, Utc::now()).await);
    Ok(())
}

pub async fn check(config: &IdlewatchConfig) -> Result<()> {
    let store = open(config).await?;
    println!("{}", render_counts(&store).await);
    Ok(())
}

async fn render_inactive(store: &ActivityStore, chat_id: ChatId, days: u32, now: DateTime<Utc>) -> String {
    let records = store.snapshot(chat_id).await;
    report::inactive_list(&engine::select(&records, days, now))
}

async fn render_counts(store: &ActivityStore) -> String {
    let chats = store.chats().await;
    if chats.is_empty() {
        return format!("No chats recorded in {}", store.state_dir().display());
    }
    let mut lines = vec![format!("State directory: {}", store.state_dir().display())];
    for chat_id in chats {
        lines.push(format!("  chat {}: {} members", chat_id, store.snapshot(chat_id).await.len()));
    }
    lines.join("\n")
}
