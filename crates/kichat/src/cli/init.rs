//! First-time setup command

use crate::Config;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(config_path: &Path, force: bool) -> Result<()> {
    println!("Initializing kichat...\n");

    // Check if config already exists
    if config_path.exists() && !force {
        println!("Error: Configuration file already exists: {}", config_path.display());
        println!("Remove it first, pass --force, or use a different path.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let config = Config::default();
    config
        .save(config_path)
        .with_context(|| format!("writing {}", config_path.display()))?;
    println!("✓ Configuration created: {}", config_path.display());
    println!();
    println!("Edit the roster section to add your buddies and neighbors, then start with:");
    println!("  kichat run");

    Ok(())
}
