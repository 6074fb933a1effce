//! Interactive console command

use crate::console::run_console;
use crate::Config;
use anyhow::Result;

pub async fn run(config: Config) -> Result<()> {
    tracing::info!("Starting kichat console");
    tracing::info!("Player: {} in {}", config.player.name, config.area.name);

    run_console(config).await
}
