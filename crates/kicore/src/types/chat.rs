//! Chat line types

use super::player::PlayerIdentity;
use crate::protocol::ChatFlags;
use serde::Serialize;

/// Where an outgoing line goes and what it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Empty means the default listening-range audience
    pub recipients: Vec<PlayerIdentity>,
    pub flags: ChatFlags,
    pub text: String,
}

impl RoutingDecision {
    pub fn new(recipients: Vec<PlayerIdentity>, flags: ChatFlags, text: impl Into<String>) -> Self {
        Self {
            recipients,
            flags,
            text: text.into(),
        }
    }

    /// Sent to whoever is within listening range
    pub fn is_listener_only(&self) -> bool {
        self.recipients.is_empty() && !self.flags.is_admin() && !self.flags.is_ccr_broadcast()
    }
}

/// Presentation category of a chat line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Subtitle,
    Status,
    AdminPrivate,
    AdminBroadcast,
    CcrBroadcast,
    NeighborsBroadcast,
    BuddiesBroadcast,
    Broadcast,
    Private,
    Error,
}

impl Category {
    /// Categories scanned for mentions of the local player
    pub fn is_broadcast_like(&self) -> bool {
        matches!(
            self,
            Self::Broadcast | Self::BuddiesBroadcast | Self::NeighborsBroadcast
        )
    }
}

/// Label rendered ahead of the sender name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContextPrefix {
    PrivateFrom,
    PrivateTo,
    Neighbors,
    Buddies,
    Global,
}

/// Whether the line gets the normal or the "you were mentioned" treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Presentation {
    #[default]
    Normal,
    Mention,
}

/// Sender as it should be labelled, with the instance it spoke from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderLabel {
    pub name: String,
    pub origin: Option<String>,
}

/// A classified line, ready for whatever draws the chat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLine {
    pub category: Category,
    pub prefix: Option<ContextPrefix>,
    pub presentation: Presentation,
    pub sender: Option<SenderLabel>,
    pub text: String,
    /// Surface must be shown at full opacity for this line
    pub force_visible: bool,
}

impl ChatLine {
    fn local(category: Category, text: impl Into<String>) -> Self {
        Self {
            category,
            prefix: None,
            presentation: Presentation::Normal,
            sender: None,
            text: text.into(),
            force_visible: false,
        }
    }

    /// Local informational line
    pub fn status(text: impl Into<String>) -> Self {
        Self::local(Category::Status, text)
    }

    /// Local error line
    pub fn error(text: impl Into<String>) -> Self {
        Self::local(Category::Error, text)
    }

    pub fn is_mention(&self) -> bool {
        self.presentation == Presentation::Mention
    }
}

/// Output of the chat pipeline for the display layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DisplayEvent {
    Line(ChatLine),
    /// Wipe the visible chat log
    ClearLog,
}

impl DisplayEvent {
    pub fn as_line(&self) -> Option<&ChatLine> {
        match self {
            Self::Line(line) => Some(line),
            Self::ClearLog => None,
        }
    }
}

impl From<ChatLine> for DisplayEvent {
    fn from(line: ChatLine) -> Self {
        Self::Line(line)
    }
}
