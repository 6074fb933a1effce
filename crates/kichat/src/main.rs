//! KI chat console (kichat)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kichat::{cli, Config};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kichat")]
#[command(about = "KI chat console", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Start the interactive chat console
    Run,

    /// Show configuration summary
    Info,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Init { force } => {
            init_tracing("info");
            cli::init::run(&config_path, force)
        }
        Commands::Run => {
            let config = load(&config_path)?;
            init_tracing(&config.logging.level);
            cli::run::run(config).await
        }
        Commands::Info => {
            let config = load(&config_path)?;
            cli::info::run(&config)
        }
        Commands::Version => {
            println!("kichat version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| {
        format!(
            "loading {} (run `kichat init` to create it)",
            path.display()
        )
    })
}

/// Log to stderr so the chat log on stdout stays readable; RUST_LOG wins
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
