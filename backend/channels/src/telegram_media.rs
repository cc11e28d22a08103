//! Telegram Media Classification
//!
//! Decides which inbound messages count as member activity.

use teloxide::types::Message;

/// What an inbound message carries, as far as activity tracking cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Audio,
    Document,
    Photo,
    Video,
    VideoNote,
    Voice,
    Text,
    Command,
    /// Stickers, polls, service messages and anything else.
    Other,
}

impl ContentKind {
    pub fn of(msg: &Message) -> Self {
        if msg.audio().is_some() {
            ContentKind::Audio
        } else if msg.document().is_some() {
            ContentKind::Document
        } else if msg.photo().is_some() {
            ContentKind::Photo
        } else if msg.video().is_some() {
            ContentKind::Video
        } else if msg.video_note().is_some() {
            ContentKind::VideoNote
        } else if msg.voice().is_some() {
            ContentKind::Voice
        } else if let Some(text) = msg.text() {
            if text.trim_start().starts_with('/') {
                ContentKind::Command
            } else {
                ContentKind::Text
            }
        } else {
            ContentKind::Other
        }
    }

    pub fn is_media(self) -> bool {
        matches!(
            self,
            ContentKind::Audio
                | ContentKind::Document
                | ContentKind::Photo
                | ContentKind::Video
                | ContentKind::VideoNote
                | ContentKind::Voice
        )
    }
}

/// Which content refreshes a member's last-seen time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingPolicy {
    /// Count plain text as activity, not only media.
    pub track_text: bool,
}

impl TrackingPolicy {
    pub fn qualifies(&self, kind: ContentKind) -> bool {
        kind.is_media() || (self.track_text && kind == ContentKind::Text)
    }
}
