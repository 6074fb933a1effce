//! # kicore
//!
//! Chat core for the KI: everything between a typed line and the network, and
//! between the network and the chat log.
//!
//! This library provides:
//!
//! - Chat flag codec (the facet bits and channel packed into one wire word)
//! - Command tables, parsing and dispatch
//! - Recipient routing (reply, private, buddies/neighbors, list selection)
//! - Inbound message classification and mention detection
//! - The chat surface fade state machine
//! - Sent-line history and recently contacted players
//!
//! ## Example
//!
//! ```rust,no_run
//! use kicore::protocol::ChatFlags;
//!
//! let flags = ChatFlags::private().with_inter_age(true).with_channel(3);
//! assert_eq!(flags.encode(), 0x0309);
//! assert_eq!(ChatFlags::decode(0x0309), flags);
//! ```

pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod fade;
pub mod history;
pub mod mention;
pub mod protocol;
pub mod router;
pub mod services;
pub mod session;
pub mod testing;
pub mod types;

// Re-export commonly used types
pub use config::{ChatConfig, FadeConfig};
pub use error::{ChatError, Result};
pub use fade::{FadeState, FadeTick};
pub use protocol::ChatFlags;
pub use services::{Capabilities, Directory, Scheduler, Services, Transport};
pub use session::ChatSession;
pub use types::{Addressee, DisplayEvent, NamedList, PlayerIdentity, SelectionContext};
