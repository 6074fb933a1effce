//! Sent-message history and recently contacted players

use crate::types::PlayerIdentity;
use std::collections::VecDeque;

/// Fixed-capacity FIFO that silently drops its oldest entry when full
#[derive(Debug, Clone)]
pub struct BoundedRing<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedRing<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        while self.items.len() >= self.capacity {
            self.items.pop_back();
        }
        self.items.push_front(item);
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// `index` 0 is the newest entry
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }
}

/// Lines the user typed, with up/down recall
#[derive(Debug, Clone)]
pub struct SentHistory {
    ring: BoundedRing<String>,
    /// `None` while editing a fresh line
    cursor: Option<usize>,
}

impl SentHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: BoundedRing::new(capacity),
            cursor: None,
        }
    }

    /// Record a typed line and reset the recall cursor
    pub fn record(&mut self, line: &str) {
        self.cursor = None;
        if line.trim().is_empty() {
            return;
        }
        self.ring.push(line.to_string());
    }

    /// Step back to an older line (the "up" key)
    pub fn recall_older(&mut self) -> Option<&str> {
        let next = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.ring.len() {
            return self.cursor.and_then(|i| self.ring.get(i)).map(String::as_str);
        }
        self.cursor = Some(next);
        self.ring.get(next).map(String::as_str)
    }

    /// Step forward to a newer line (the "down" key); `None` means back to an empty line
    pub fn recall_newer(&mut self) -> Option<&str> {
        match self.cursor {
            None | Some(0) => {
                self.cursor = None;
                None
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                self.ring.get(i - 1).map(String::as_str)
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.ring.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

/// Players most recently talked to or heard from privately
#[derive(Debug, Clone)]
pub struct RecentPlayers {
    ring: BoundedRing<PlayerIdentity>,
}

impl RecentPlayers {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: BoundedRing::new(capacity),
        }
    }

    /// Move `player` to the front, dropping any earlier entry for them
    pub fn touch(&mut self, player: &PlayerIdentity) {
        self.ring.retain(|p| p != player);
        self.ring.push(player.clone());
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerIdentity> {
        self.ring.iter()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
