mod config_cmd;
mod serve_cmd;
mod state_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "idlewatch")]
#[command(about = "Idlewatch — track member activity and prune inactive members from Telegram groups")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.idlewatch/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot
    Serve,
    /// List members of a chat inactive for at least N days, from the state directory
    Inactive {
        /// Chat id (group ids are negative)
        #[arg(long, allow_hyphen_values = true)]
        chat: i64,
        /// Minimum whole days without activity
        #[arg(long)]
        days: u32,
    },
    /// Load the state directory and report per-chat record counts
    CheckState,
    /// Write a config file with default values
    InitConfig {
        /// Overwrite an existing file (the old one is kept as a backup)
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| idlewatch_config::config_file_path(&idlewatch_config::config_dir()));

    if let Commands::InitConfig { force } = cli.command {
        return config_cmd::init(&path, force).await;
    }

    let config = idlewatch_config::load_and_prepare(&path).await?;
    idlewatch_logging::init_logger(config.logging.dir.as_deref(), &config.logging.level);
    tracing::debug!(path = %path.display(), "Configuration ready");

    match cli.command {
        Commands::Serve => serve_cmd::run(config).await,
        Commands::Inactive { chat, days } => state_cmd::inactive(&config, chat, days).await,
        Commands::CheckState => state_cmd::check(&config).await,
        Commands::InitConfig { force } => config_cmd::init(&path, force).await,
    }
}
