pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

use std::sync::Arc;

use idlewatch_core::ChatPlatform;
use idlewatch_moderation::Moderator;

pub use detection::detect_command;
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandResponse, NOT_AUTHORIZED};
pub use handlers::{parse_days, BanOrKickHandler, HelpHandler, ShowHandler};
pub use registry::{builtin_commands, CommandRegistry};
pub use types::{CommandArg, CommandDef, CommandInvocation};

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_dispatcher(moderator: Arc<Moderator>, platform: Arc<dyn ChatPlatform>) -> CommandDispatcher {
    let registry = CommandRegistry::new();
    let mut dispatcher = CommandDispatcher::new(registry.clone(), platform);

    dispatcher.register("help", Arc::new(HelpHandler { registry: registry.clone() }));
    dispatcher.register(
        "show",
        Arc::new(ShowHandler { registry: registry.clone(), moderator: moderator.clone() }),
    );
    dispatcher.register(
        "ban_or_kick",
        Arc::new(BanOrKickHandler { registry, moderator }),
    );

    dispatcher
}
