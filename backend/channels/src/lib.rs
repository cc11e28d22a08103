use async_trait::async_trait;

pub mod telegram;
pub mod telegram_groups;
pub mod telegram_media;
pub mod telegram_platform;

pub use telegram::TelegramAdapter;
pub use telegram_media::{ContentKind, TrackingPolicy};
pub use telegram_platform::TelegramPlatform;

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Run the adapter's inbound loop until shutdown.
    async fn start(&self) -> anyhow::Result<()>;
}
