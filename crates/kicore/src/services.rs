//! Collaborators the chat core talks to
//!
//! Everything runs on one event thread, so the services are shared through
//! `Rc` and take `&self`; implementations use interior mutability if they
//! need to record anything.

use crate::fade::FadeTick;
use crate::protocol::ChatFlags;
use crate::types::PlayerIdentity;
use std::rc::Rc;
use std::time::Duration;

/// Buddy, neighbor and ignore lists plus online status
pub trait Directory {
    fn is_online(&self, player: &PlayerIdentity) -> bool;
    fn buddies(&self) -> Vec<PlayerIdentity>;
    fn neighbors(&self) -> Vec<PlayerIdentity>;
    fn is_ignored(&self, player: &PlayerIdentity) -> bool;
    /// Whether the shard-wide player list is available to this client
    fn all_players_list_requested(&self) -> bool;
}

/// Network send. Fire-and-forget: nothing is awaited or retried here.
pub trait Transport {
    fn send(&self, recipients: &[PlayerIdentity], text: &str, flags: ChatFlags);
}

/// Timer service. Schedules exactly one future delivery of `tick`.
///
/// There is no cancellation: stale ticks are discarded by the fade machine.
pub trait Scheduler {
    fn after(&self, delay: Duration, tick: FadeTick);
}

/// Side effects a chat command may trigger outside the chat log
pub trait Capabilities {
    fn play_animation(&self, name: &str);
    fn open_sub_dialog(&self, name: &str);
    fn change_setting(&self, key: &str, value: &str);
}

/// The full set of collaborators a [`ChatSession`](crate::session::ChatSession) needs
#[derive(Clone)]
pub struct Services {
    pub directory: Rc<dyn Directory>,
    pub transport: Rc<dyn Transport>,
    pub scheduler: Rc<dyn Scheduler>,
    pub capabilities: Rc<dyn Capabilities>,
}
