//! Chat command parsing and dispatch

pub mod dispatch;
pub mod handlers;
pub mod table;

pub use dispatch::{dispatch, Dispatch, ParsedCommand};
pub use handlers::{CommandEnv, Effect, Reply};
pub use table::{CommandContext, CommandEntry, CommandKind, CommandRegistry, TableKind};
