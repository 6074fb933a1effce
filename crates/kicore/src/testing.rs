//! In-memory collaborators for tests and tools

use crate::fade::FadeTick;
use crate::protocol::ChatFlags;
use crate::services::{Capabilities, Directory, Scheduler, Transport};
use crate::types::PlayerIdentity;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

/// Directory backed by plain lists
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    buddies: RefCell<Vec<PlayerIdentity>>,
    neighbors: RefCell<Vec<PlayerIdentity>>,
    online: RefCell<Vec<PlayerIdentity>>,
    ignored: RefCell<Vec<PlayerIdentity>>,
    all_players: bool,
}

impl MemoryDirectory {
    pub fn with_buddy(self, player: PlayerIdentity, online: bool) -> Self {
        if online {
            self.set_online(&player, true);
        }
        self.buddies.borrow_mut().push(player);
        self
    }

    pub fn with_neighbor(self, player: PlayerIdentity, online: bool) -> Self {
        if online {
            self.set_online(&player, true);
        }
        self.neighbors.borrow_mut().push(player);
        self
    }

    pub fn with_online(self, player: PlayerIdentity) -> Self {
        self.set_online(&player, true);
        self
    }

    pub fn with_ignored(self, player: PlayerIdentity) -> Self {
        self.ignored.borrow_mut().push(player);
        self
    }

    pub fn with_all_players_list(mut self) -> Self {
        self.all_players = true;
        self
    }

    pub fn set_online(&self, player: &PlayerIdentity, online: bool) {
        let mut list = self.online.borrow_mut();
        list.retain(|p| p != player);
        if online {
            list.push(player.clone());
        }
    }

    pub fn set_ignored(&self, player: &PlayerIdentity, ignored: bool) {
        let mut list = self.ignored.borrow_mut();
        list.retain(|p| p != player);
        if ignored {
            list.push(player.clone());
        }
    }
}

impl Directory for MemoryDirectory {
    fn is_online(&self, player: &PlayerIdentity) -> bool {
        self.online.borrow().contains(player)
    }

    fn buddies(&self) -> Vec<PlayerIdentity> {
        self.buddies.borrow().clone()
    }

    fn neighbors(&self) -> Vec<PlayerIdentity> {
        self.neighbors.borrow().clone()
    }

    fn is_ignored(&self, player: &PlayerIdentity) -> bool {
        self.ignored.borrow().contains(player)
    }

    fn all_players_list_requested(&self) -> bool {
        self.all_players
    }
}

/// One call to [`Transport::send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipients: Vec<PlayerIdentity>,
    pub text: String,
    pub flags: ChatFlags,
}

/// Transport that remembers what it was asked to send
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: RefCell<Vec<SentMessage>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.borrow().clone()
    }

    pub fn last(&self) -> Option<SentMessage> {
        self.sent.borrow().last().cloned()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, recipients: &[PlayerIdentity], text: &str, flags: ChatFlags) {
        self.sent.borrow_mut().push(SentMessage {
            recipients: recipients.to_vec(),
            text: text.to_string(),
            flags,
        });
    }
}

/// Scheduler whose ticks are delivered by hand, oldest first
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(Duration, FadeTick)>>,
}

impl ManualScheduler {
    pub fn pop(&self) -> Option<(Duration, FadeTick)> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn peek(&self) -> Option<(Duration, FadeTick)> {
        self.queue.borrow().front().copied()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, tick: FadeTick) {
        self.queue.borrow_mut().push_back((delay, tick));
    }
}

/// Capabilities that only record what was asked of them
#[derive(Debug, Default)]
pub struct RecordingCapabilities {
    animations: RefCell<Vec<String>>,
    dialogs: RefCell<Vec<String>>,
    settings: RefCell<Vec<(String, String)>>,
}

impl RecordingCapabilities {
    pub fn animations(&self) -> Vec<String> {
        self.animations.borrow().clone()
    }

    pub fn dialogs(&self) -> Vec<String> {
        self.dialogs.borrow().clone()
    }

    pub fn settings(&self) -> Vec<(String, String)> {
        self.settings.borrow().clone()
    }
}

impl Capabilities for RecordingCapabilities {
    fn play_animation(&self, name: &str) {
        self.animations.borrow_mut().push(name.to_string());
    }

    fn open_sub_dialog(&self, name: &str) {
        self.dialogs.borrow_mut().push(name.to_string());
    }

    fn change_setting(&self, key: &str, value: &str) {
        self.settings
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
    }
}
