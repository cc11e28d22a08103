/// Slash command detection — identify /commands in inbound messages.
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Detect a slash command at the start of a message.
///
/// Group chats address bots as `/show@SomeBot 7`. When `bot_username` is
/// known, a suffix naming any other bot means the command is not ours.
/// Returns `None` for ordinary text and unknown commands.
pub fn detect_command(
    text: &str,
    registry: &CommandRegistry,
    bot_username: Option<&str>,
) -> Option<CommandInvocation> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    // Find the first whitespace to split alias from args
    let (alias_part, rest) = trimmed.split_once(|c: char| c.is_whitespace())
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((trimmed, ""));
    let alias = match alias_part.split_once('@') {
        Some((alias, target)) => {
            if bot_username.is_some_and(|me| !me.eq_ignore_ascii_case(target)) {
                return None;
            }
            alias
        }
        None => alias_part,
    };

    let def = registry.find_by_alias(alias)?;

    Some(CommandInvocation {
        key: def.key.clone(),
        raw_alias: alias_part.to_string(),
        args: rest.split_whitespace().map(str::to_string).collect(),
        raw_args: rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_command_with_args() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/ban_or_kick  kick   7", &registry, None).unwrap();
        assert_eq!(inv.key, "ban_or_kick");
        assert_eq!(inv.args, vec!["kick", "7"]);
    }

    #[test]
    fn strips_bot_mention() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/show@IdlewatchBot 3", &registry, Some("idlewatchbot")).unwrap();
        assert_eq!(inv.key, "show");
        assert_eq!(inv.raw_alias, "/show@IdlewatchBot");
        assert_eq!(inv.args, vec!["3"]);
    }

    #[test]
    fn ignores_commands_for_other_bots() {
        let registry = CommandRegistry::new();
        assert!(detect_command("/show@OtherBot 7", &registry, Some("IdlewatchBot")).is_none());
        assert!(detect_command("/show@OtherBot 7", &registry, None).is_some());
        assert!(detect_command("/show 7", &registry, Some("IdlewatchBot")).is_some());
    }

    #[test]
    fn ignores_plain_text_and_unknown_commands() {
        let registry = CommandRegistry::new();
        assert!(detect_command("hello /show 3", &registry, None).is_none());
        assert!(detect_command("/unknown 3", &registry, None).is_none());
    }

    #[test]
    fn keeps_extra_args_for_arity_checks() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/show 3 4", &registry, Some("IdlewatchBot")).unwrap();
        assert_eq!(inv.args, vec!["3", "4"]);
        assert_eq!(inv.raw_args, "3 4");
    }
}
