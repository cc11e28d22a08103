/// Built-in command handlers.
///
/// Each handler is a concrete struct implementing `CommandHandler`.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use idlewatch_core::WatchError;
use idlewatch_moderation::{report, ModerationAction, Moderator};

use crate::dispatch::{CommandContext, CommandHandler, CommandResponse};
use crate::registry::CommandRegistry;
use crate::types::{CommandDef, CommandInvocation};

/// Parse a day count: ASCII digits only, no sign, fits in `u32`.
pub fn parse_days(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn usage(registry: &CommandRegistry, key: &str) -> CommandResponse {
    let text = registry
        .find_by_key(key)
        .map(CommandDef::usage)
        .unwrap_or_else(|| format!("Usage: /{}", key));
    CommandResponse::ok(text)
}

// ---------------------------------------------------------------------------
// /help
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    pub registry: CommandRegistry,
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        let mut lines = vec!["Available commands:".to_string()];
        for cmd in self.registry.all() {
            let suffix = if cmd.admin_only { " (admins only)" } else { "" };
            lines.push(format!("{} — {}{}", cmd.usage().trim_start_matches("Usage: "), cmd.description, suffix));
        }
        Ok(CommandResponse::ok(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// /show
// ---------------------------------------------------------------------------

pub struct ShowHandler {
    pub registry: CommandRegistry,
    pub moderator: Arc<Moderator>,
}

#[async_trait]
impl CommandHandler for ShowHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let days = match inv.args.as_slice() {
            [days] => parse_days(days),
            _ => None,
        };
        let Some(days) = days else {
            return Ok(usage(&self.registry, "show"));
        };

        let selected = self.moderator.inactive(ctx.chat_id, days, ctx.now).await;
        info!(chat_id = ctx.chat_id, days, found = selected.len(), "[Commands] Listing inactive members");
        Ok(CommandResponse::ok(report::inactive_list(&selected)))
    }
}

// ---------------------------------------------------------------------------
// /ban_or_kick
// ---------------------------------------------------------------------------

pub struct BanOrKickHandler {
    pub registry: CommandRegistry,
    pub moderator: Arc<Moderator>,
}

#[async_trait]
impl CommandHandler for BanOrKickHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let parsed = match inv.args.as_slice() {
            [action, days] => action
                .parse::<ModerationAction>()
                .ok()
                .zip(parse_days(days)),
            _ => None,
        };
        let Some((action, days)) = parsed else {
            return Ok(usage(&self.registry, "ban_or_kick"));
        };

        match self.moderator.enforce(ctx.chat_id, action, days, ctx.now).await {
            Ok(report) => Ok(CommandResponse::many(report.messages())),
            Err(WatchError::Validation(reason)) => Ok(CommandResponse::ok(format!(
                "{}\n{}",
                reason,
                usage(&self.registry, "ban_or_kick").messages.join("\n")
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_must_be_plain_digits() {
        assert_eq!(parse_days("0"), Some(0));
        assert_eq!(parse_days("30"), Some(30));
        assert_eq!(parse_days("007"), Some(7));
        for bad in ["", "-1", "+3", "3.5", "three", " 3", "99999999999"] {
            assert_eq!(parse_days(bad), None, "{:?}", bad);
        }
    }
}
