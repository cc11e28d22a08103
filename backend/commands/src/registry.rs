/// Slash command registry.
use crate::types::{ArgType, CommandArg, CommandDef};

fn arg(name: &str, description: &str, ty: ArgType, choices: &[&str]) -> CommandArg {
    CommandArg {
        name: name.to_string(),
        description: description.to_string(),
        arg_type: ty,
        choices: choices.iter().map(|s| s.to_string()).collect(),
    }
}

fn days_arg() -> CommandArg {
    arg("number_of_days", "Minimum whole days without activity", ArgType::Number, &[])
}

/// Build the built-in command registry.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        CommandDef {
            key: "help".into(),
            description: "Show available commands.".into(),
            text_aliases: vec!["/help".into(), "/start".into()],
            args: vec![],
            admin_only: false,
        },
        CommandDef {
            key: "show".into(),
            description: "List members inactive for at least N days.".into(),
            text_aliases: vec!["/show".into()],
            args: vec![days_arg()],
            admin_only: true,
        },
        CommandDef {
            key: "ban_or_kick".into(),
            description: "Kick or ban members inactive for at least N days.".into(),
            text_aliases: vec!["/ban_or_kick".into()],
            args: vec![
                arg("action", "What to do with inactive members", ArgType::String, &["ban", "kick"]),
                days_arg(),
            ],
            admin_only: true,
        },
    ]
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    /// Find a command by slash-text alias (e.g. "/show").
    pub fn find_by_alias(&self, alias: &str) -> Option<&CommandDef> {
        let lower = alias.to_lowercase();
        self.commands.iter().find(|c| {
            c.text_aliases.iter().any(|a| a.to_lowercase() == lower)
        })
    }

    /// Find a command by its key.
    pub fn find_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.key == key)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_lines() {
        let registry = CommandRegistry::new();
        assert_eq!(
            registry.find_by_key("ban_or_kick").unwrap().usage(),
            "Usage: /ban_or_kick <ban|kick> <number_of_days>"
        );
        assert_eq!(
            registry.find_by_key("show").unwrap().usage(),
            "Usage: /show <number_of_days>"
        );
    }

    #[test]
    fn moderation_commands_are_admin_only() {
        let registry = CommandRegistry::new();
        assert!(registry.find_by_key("show").unwrap().admin_only);
        assert!(registry.find_by_key("ban_or_kick").unwrap().admin_only);
        assert!(!registry.find_by_key("help").unwrap().admin_only);
    }

    #[test]
    fn alias_lookup_is_case_insensitive() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.find_by_alias("/SHOW").unwrap().key, "show");
        assert_eq!(registry.find_by_alias("/start").unwrap().key, "help");
        assert!(registry.find_by_alias("/think").is_none());
    }
}
