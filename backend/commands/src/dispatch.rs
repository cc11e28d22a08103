/// Command dispatch — route detected commands to handler functions.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use idlewatch_core::{ChatId, ChatPlatform, MemberId};

use crate::detection::detect_command;
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

pub const NOT_AUTHORIZED: &str = "You are not authorized to use this command.";

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub chat_id: ChatId,
    pub sender_id: MemberId,
    /// Clock reading for the whole command, so every member is judged
    /// against the same instant.
    pub now: DateTime<Utc>,
}

/// Replies to send back, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub messages: Vec<String>,
}

impl CommandResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { messages: vec![text.into()] }
    }

    pub fn many(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher {
    registry: CommandRegistry,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    platform: Arc<dyn ChatPlatform>,
    bot_username: Option<String>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry, platform: Arc<dyn ChatPlatform>) -> Self {
        Self { registry, handlers: HashMap::new(), platform, bot_username: None }
    }

    /// Only answer `/cmd@Name` when `Name` is this bot.
    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Detect and dispatch a command in `text`. `None` when it is not one of ours.
    pub async fn handle_text(&self, ctx: &CommandContext, text: &str) -> Option<Result<CommandResponse>> {
        let inv = detect_command(text, &self.registry, self.bot_username.as_deref())?;
        Some(self.dispatch(ctx, &inv).await)
    }

    /// Run the handler for `inv`. Admin-only commands are rejected before the
    /// handler runs unless the sender is an owner or administrator.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        inv: &CommandInvocation,
    ) -> Result<CommandResponse> {
        let admin_only = self
            .registry
            .find_by_key(&inv.key)
            .map(|def| def.admin_only)
            .unwrap_or(true);
        if admin_only && !self.is_admin(ctx).await {
            info!(chat_id = ctx.chat_id, sender_id = ctx.sender_id, command = %inv.key, "Rejected unauthorized command");
            return Ok(CommandResponse::ok(NOT_AUTHORIZED));
        }

        if let Some(handler) = self.handlers.get(&inv.key) {
            info!(chat_id = ctx.chat_id, sender_id = ctx.sender_id, "[Commands] Dispatching /{}", inv.key);
            handler.handle(ctx, inv).await
        } else {
            Ok(CommandResponse::ok(format!("No handler registered for command /{}", inv.key)))
        }
    }

    /// A failed status lookup counts as not authorized.
    async fn is_admin(&self, ctx: &CommandContext) -> bool {
        match self.platform.member_status(ctx.chat_id, ctx.sender_id).await {
            Ok(status) => status.is_privileged(),
            Err(e) => {
                warn!(chat_id = ctx.chat_id, sender_id = ctx.sender_id, error = %e, "Member status lookup failed");
                false
            }
        }
    }
}
