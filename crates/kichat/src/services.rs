//! Console-side collaborators for the chat session

use crate::config::RosterConfig;
use kicore::types::names_match;
use kicore::{Capabilities, ChatFlags, Directory, FadeTick, PlayerIdentity, Scheduler, Transport};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Events posted back into the console loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Fade(FadeTick),
}

/// Directory backed by the configured roster
#[derive(Debug)]
pub struct Roster {
    state: RefCell<RosterConfig>,
}

impl Roster {
    pub fn new(config: RosterConfig) -> Self {
        Self {
            state: RefCell::new(config),
        }
    }

    pub fn age_members(&self) -> Vec<PlayerIdentity> {
        self.state.borrow().age_members.clone()
    }

    /// Look a player up by name in every list; unknown names get no id
    pub fn find(&self, name: &str) -> PlayerIdentity {
        let state = self.state.borrow();
        state
            .age_members
            .iter()
            .chain(&state.buddies)
            .chain(&state.neighbors)
            .find(|p| p.has_name(name))
            .cloned()
            .unwrap_or_else(|| PlayerIdentity::named(name))
    }

    pub fn set_online(&self, name: &str, online: bool) {
        let mut state = self.state.borrow_mut();
        set_member(&mut state.online, name, online);
    }

    pub fn set_ignored(&self, name: &str, ignored: bool) {
        let mut state = self.state.borrow_mut();
        set_member(&mut state.ignored, name, ignored);
    }

    pub fn snapshot(&self) -> RosterConfig {
        self.state.borrow().clone()
    }
}

fn set_member(names: &mut Vec<String>, name: &str, present: bool) {
    names.retain(|n| !names_match(n, name));
    if present {
        names.push(name.to_string());
    }
}

impl Directory for Roster {
    fn is_online(&self, player: &PlayerIdentity) -> bool {
        let state = self.state.borrow();
        state.age_members.contains(player) || state.online.iter().any(|n| player.has_name(n))
    }

    fn buddies(&self) -> Vec<PlayerIdentity> {
        self.state.borrow().buddies.clone()
    }

    fn neighbors(&self) -> Vec<PlayerIdentity> {
        self.state.borrow().neighbors.clone()
    }

    fn is_ignored(&self, player: &PlayerIdentity) -> bool {
        self.state.borrow().ignored.iter().any(|n| player.has_name(n))
    }

    fn all_players_list_requested(&self) -> bool {
        self.state.borrow().all_players_list
    }
}

/// Transport with no network behind it; sends are logged and counted
#[derive(Debug, Default)]
pub struct LoggingTransport {
    sent: Cell<usize>,
}

impl LoggingTransport {
    pub fn sent(&self) -> usize {
        self.sent.get()
    }
}

impl Transport for LoggingTransport {
    fn send(&self, recipients: &[PlayerIdentity], text: &str, flags: ChatFlags) {
        self.sent.set(self.sent.get() + 1);
        let names: Vec<&str> = recipients.iter().map(|p| p.name.as_str()).collect();
        tracing::info!(
            recipients = ?names,
            wire = flags.encode(),
            "send: {}",
            text
        );
    }
}

/// Capabilities that log what they would do; ignore settings update the roster
pub struct ConsoleCapabilities {
    roster: Rc<Roster>,
}

impl ConsoleCapabilities {
    pub fn new(roster: Rc<Roster>) -> Self {
        Self { roster }
    }
}

impl Capabilities for ConsoleCapabilities {
    fn play_animation(&self, name: &str) {
        tracing::info!("Playing animation {}", name);
    }

    fn open_sub_dialog(&self, name: &str) {
        tracing::info!("Opening dialog {}", name);
    }

    fn change_setting(&self, key: &str, value: &str) {
        match key {
            "ignore" => self.roster.set_ignored(value, true),
            "unignore" => self.roster.set_ignored(value, false),
            _ => {}
        }
        tracing::info!("Setting {} = {}", key, value);
    }
}

/// Scheduler on the tokio timer; ticks come back as [`Event::Fade`]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Event>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, tick: FadeTick) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The loop may already be gone on shutdown
            let _ = tx.send(Event::Fade(tick));
        });
    }
}
