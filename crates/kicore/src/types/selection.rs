//! Addressing context handed to the router

use super::player::PlayerIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player lists that can be selected as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedList {
    /// Everyone in the current instance
    AgeMembers,
    Buddies,
    Neighbors,
    /// Every player on the shard; only usable by privileged clients
    AllPlayers,
}

impl NamedList {
    /// Parse a list name as typed in the console or config
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "age" | "agemembers" | "age_members" => Some(Self::AgeMembers),
            "buddies" => Some(Self::Buddies),
            "neighbors" | "neighbours" => Some(Self::Neighbors),
            "all" | "allplayers" | "all_players" => Some(Self::AllPlayers),
            _ => None,
        }
    }
}

impl fmt::Display for NamedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AgeMembers => "Age players",
            Self::Buddies => "Buddies",
            Self::Neighbors => "Neighbors",
            Self::AllPlayers => "All players",
        };
        f.write_str(label)
    }
}

/// What the player list currently has selected
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Addressee {
    Player(PlayerIdentity),
    List(NamedList),
    /// The "people within listening range" pseudo-folder
    InRange,
    #[default]
    None,
}

/// Addressing state captured at the moment a line is submitted
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    pub addressee: Addressee,
    /// Players present in the local instance
    pub age_members: Vec<PlayerIdentity>,
}

impl SelectionContext {
    pub fn new(addressee: Addressee, age_members: Vec<PlayerIdentity>) -> Self {
        Self {
            addressee,
            age_members,
        }
    }

    /// Whether `player` is in the local instance
    pub fn is_local(&self, player: &PlayerIdentity) -> bool {
        self.age_members.iter().any(|p| p == player)
    }
}
