//! Player types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A player as far as chat is concerned
///
/// Two identities are equal when both carry an id and the ids match. When
/// either side has no id, the display names are compared instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub name: String,
    #[serde(default)]
    pub id: Option<u32>,
}

impl PlayerIdentity {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
        }
    }

    /// Identity known only by name (typed by the user, or from an origin tag)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

/// Compare player names under Unicode lowercase folding
///
/// This is the same per-character folding the mention matcher applies.
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl PartialEq for PlayerIdentity {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

impl Eq for PlayerIdentity {}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
