//! Turns one typed line into either chat text or a handled command

use super::handlers::{self, CommandEnv, Effect, Reply};
use super::table::is_router_marker;
use crate::error::ChatError;
use crate::protocol::constants::COMMAND_MARKER;
use crate::types::{ChatLine, DisplayEvent};

/// Verdict on one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Nothing left to send
    Consumed,
    /// Text to hand on to the router
    Residual(String),
    /// Not a command we know; an error line has been produced
    Rejected(ChatError),
}

/// Everything dispatching a line produced
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub outcome: ParsedCommand,
    pub events: Vec<DisplayEvent>,
    pub effects: Vec<Effect>,
}

impl Dispatch {
    fn new() -> Self {
        Self {
            outcome: ParsedCommand::Consumed,
            events: Vec::new(),
            effects: Vec::new(),
        }
    }

    fn show(&mut self, reply: Reply) {
        match reply {
            Reply::Status(text) | Reply::Checked(true, text) => {
                self.events.push(ChatLine::status(text).into())
            }
            Reply::Checked(false, text) => self.events.push(ChatLine::error(text).into()),
            Reply::Silent => {}
        }
    }
}

/// Run `line` through the command tables
///
/// Emote and `/me` commands leave residual text behind, which goes around the
/// loop again so that `/wave /p Atrus hi` still reaches the router.
pub fn dispatch(line: &str, env: &CommandEnv<'_>) -> Dispatch {
    let mut out = Dispatch::new();
    let mut text = line.to_string();

    loop {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            out.outcome = ParsedCommand::Consumed;
            return out;
        }

        if let Some((entry, rest)) = env.registry.find(trimmed) {
            tracing::debug!("Matched {} from the {:?} table", entry.token, entry.table);
            let handled = handlers::run(entry, rest, env, &mut out.effects);
            out.show(handled.reply);
            match handled.residual {
                Some(residual) => {
                    text = residual;
                    continue;
                }
                None => {
                    out.outcome = ParsedCommand::Consumed;
                    return out;
                }
            }
        }

        if !trimmed.starts_with(COMMAND_MARKER) || is_router_marker(trimmed) {
            out.outcome = ParsedCommand::Residual(text);
            return out;
        }

        let token = trimmed.split_whitespace().next().unwrap_or(trimmed).to_string();
        tracing::debug!("Unknown command {}", token);
        let err = ChatError::UnknownCommand(token);
        out.events.push(ChatLine::error(err.to_string()).into());
        out.outcome = ParsedCommand::Rejected(err);
        return out;
    }
}
