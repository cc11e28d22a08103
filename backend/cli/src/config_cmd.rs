//! CLI Config Command
//!
//! Writes a starter config file. The token is left out so offline commands
//! load without one; `serve` picks it up from `TELEGRAM_TOKEN`.

use std::path::Path;

use anyhow::{bail, Result};

use idlewatch_config::{write_config, IdlewatchConfig};

pub async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }

    write_config(&IdlewatchConfig::default(), path).await?;

    println!("Wrote {}", path.display());
    Ok(())
}
