//! Chat tuning knobs

use crate::protocol::constants::{
    DEFAULT_FADE_TICKS, DEFAULT_FADE_TICK_MS, DEFAULT_FULL_TICKS, DEFAULT_FULL_TICK_MS,
    DEFAULT_HISTORY_CAPACITY, DEFAULT_RECENTS_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub history_capacity: usize,
    pub recents_capacity: usize,
    pub fade: FadeConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            recents_capacity: DEFAULT_RECENTS_CAPACITY,
            fade: FadeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Full-visibility ticks before the fade starts; 0 never fades
    pub full_ticks: u32,
    pub fade_ticks: u32,
    pub full_tick_ms: u64,
    pub fade_tick_ms: u64,
}

impl FadeConfig {
    pub fn is_enabled(&self) -> bool {
        self.full_ticks > 0
    }

    pub fn full_tick(&self) -> Duration {
        Duration::from_millis(self.full_tick_ms)
    }

    pub fn fade_tick(&self) -> Duration {
        Duration::from_millis(self.fade_tick_ms)
    }

    /// Full-visibility ticks needed to cover `seconds`
    pub fn ticks_for_seconds(&self, seconds: u32) -> u32 {
        if self.full_tick_ms == 0 {
            return seconds;
        }
        let ms = u64::from(seconds) * 1000;
        ms.div_ceil(self.full_tick_ms).min(u64::from(u32::MAX)) as u32
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            full_ticks: DEFAULT_FULL_TICKS,
            fade_ticks: DEFAULT_FADE_TICKS,
            full_tick_ms: DEFAULT_FULL_TICK_MS,
            fade_tick_ms: DEFAULT_FADE_TICK_MS,
        }
    }
}
