//! Error types

use thiserror::Error;

/// Chat pipeline errors
///
/// None of these escape [`ChatSession`](crate::session::ChatSession); they are
/// turned into local display lines at the dispatcher/router boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The raw name is not carried: it may hold words that belong to the message.
    #[error("Could not find that player")]
    AddresseeNotFound,

    #[error("{0} went offline")]
    AddresseeOffline(String),

    #[error("No one to reply to")]
    NoReplyTarget,

    #[error("Nothing to send")]
    EmptyMessage,
}

impl ChatError {
    /// Whether the error should be shown to the user at all
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::EmptyMessage)
    }
}

/// Result type for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;
