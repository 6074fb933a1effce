//! Configuration management

use kicore::types::Phrases;
use kicore::{ChatConfig, PlayerIdentity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub player: PlayerConfig,
    pub area: AreaConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub phrases: Phrases,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub id: u32,
    /// Enables the privileged command table
    #[serde(default)]
    pub privileged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    pub name: String,
}

/// Who else exists, as far as the console knows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Players in the same instance
    pub age_members: Vec<PlayerIdentity>,
    pub buddies: Vec<PlayerIdentity>,
    pub neighbors: Vec<PlayerIdentity>,
    /// Names of players currently online anywhere
    pub online: Vec<String>,
    pub ignored: Vec<String>,
    /// Whether the shard-wide player list is available
    pub all_players_list: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `kichat/kichat.json` under the platform config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kichat")
            .join("kichat.json")
    }

    /// Create default configuration
    pub fn default() -> Self {
        let member = |name: &str, id| PlayerIdentity::new(name, id);
        Self {
            player: PlayerConfig {
                name: "Sharper".to_string(),
                id: 100,
                privileged: false,
            },
            area: AreaConfig {
                name: "Relto".to_string(),
            },
            chat: ChatConfig::default(),
            roster: RosterConfig {
                age_members: vec![member("Atrus", 1)],
                buddies: vec![member("Yeesha", 2), member("Gehn", 5)],
                neighbors: vec![member("Kodama", 7)],
                online: vec!["Atrus".to_string(), "Yeesha".to_string(), "Kodama".to_string()],
                ignored: Vec::new(),
                all_players_list: false,
            },
            phrases: Phrases::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    pub fn local_player(&self) -> PlayerIdentity {
        PlayerIdentity::new(self.player.name.clone(), self.player.id)
    }
}
