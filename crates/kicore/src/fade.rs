//! Timed fade of the chat surface
//!
//! The machine only moves when the scheduler hands back a [`FadeTick`]. Every
//! tick carries the generation it was scheduled under; a hard reset bumps the
//! generation, so ticks still in flight from before are dropped when they
//! arrive instead of being cancelled.

use crate::config::FadeConfig;
use crate::services::Scheduler;
use std::time::Duration;

/// Fade lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeState {
    NotActive,
    FullDisplay,
    DoingFade,
    Done,
    Stopping,
}

/// Token handed to the scheduler and returned to [`FadeMachine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FadeTick {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct FadeMachine {
    config: FadeConfig,
    state: FadeState,
    remaining: u32,
    opacity: f32,
    scroll_enabled: bool,
    generation: u64,
    /// A tick for the current generation is in flight
    pending: bool,
    pinned: bool,
    chatting: bool,
}

impl FadeMachine {
    pub fn new(config: FadeConfig) -> Self {
        Self {
            config,
            state: FadeState::NotActive,
            remaining: 0,
            opacity: 1.0,
            scroll_enabled: true,
            generation: 0,
            pending: false,
            pinned: false,
            chatting: false,
        }
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    /// Ticks left in the current phase
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Surface opacity, 1.0 opaque to 0.0 transparent
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether the chat list may be scrolled
    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_chatting(&self) -> bool {
        self.chatting
    }

    pub fn config(&self) -> &FadeConfig {
        &self.config
    }

    /// Change how long the surface stays fully visible; 0 turns fading off
    pub fn set_full_ticks(&mut self, ticks: u32) {
        self.config.full_ticks = ticks;
        if ticks == 0 {
            self.hard_reset();
        }
    }

    /// Start the countdown if it is not already running
    ///
    /// Arming while already counting is a no-op, so a burst of events costs a
    /// single countdown.
    pub fn arm(&mut self, scheduler: &dyn Scheduler) {
        if self.pinned || self.chatting || !self.config.is_enabled() {
            return;
        }

        match self.state {
            FadeState::NotActive | FadeState::Done => {
                self.restore();
                self.enter_full_display();
                self.schedule(scheduler, self.config.full_tick());
            }
            FadeState::Stopping => self.restart(scheduler),
            FadeState::FullDisplay | FadeState::DoingFade => {}
        }
    }

    /// Chat activity: undo any fade progress and count down from the top
    pub fn reset(&mut self, scheduler: &dyn Scheduler) {
        if self.chatting || self.pinned {
            return;
        }

        match self.state {
            FadeState::FullDisplay => {
                // The tick in flight is already a full tick
                self.enter_full_display();
                if !self.pending {
                    self.schedule(scheduler, self.config.full_tick());
                }
            }
            FadeState::DoingFade | FadeState::Stopping => self.restart(scheduler),
            FadeState::NotActive | FadeState::Done => self.arm(scheduler),
        }
    }

    /// Ask a running countdown to wind down on its next tick
    pub fn stop(&mut self) {
        match self.state {
            FadeState::FullDisplay | FadeState::DoingFade => {
                self.state = FadeState::Stopping;
            }
            FadeState::Done => {
                self.restore();
                self.state = FadeState::NotActive;
            }
            FadeState::NotActive | FadeState::Stopping => {}
        }
    }

    /// Back to opaque and idle; anything in flight becomes stale
    pub fn hard_reset(&mut self) {
        self.generation += 1;
        self.pending = false;
        self.restore();
        self.state = FadeState::NotActive;
        self.remaining = 0;
    }

    /// Opening the large panel pins the surface open and disarms the timer
    pub fn set_pinned(&mut self, pinned: bool, scheduler: &dyn Scheduler) {
        self.pinned = pinned;
        if pinned {
            self.hard_reset();
        } else {
            self.arm(scheduler);
        }
    }

    /// While the user is typing the surface stays opaque
    pub fn set_chatting(&mut self, chatting: bool, scheduler: &dyn Scheduler) {
        self.chatting = chatting;
        if chatting {
            self.hard_reset();
        } else {
            self.reset(scheduler);
        }
    }

    /// Advance one step; the only entry point the scheduler drives
    pub fn tick(&mut self, tick: FadeTick, scheduler: &dyn Scheduler) {
        if tick.generation != self.generation {
            tracing::trace!("Dropping stale fade tick");
            return;
        }
        self.pending = false;

        match self.state {
            FadeState::NotActive | FadeState::Done => {}
            FadeState::Stopping => {
                self.restore();
                self.state = FadeState::NotActive;
                self.remaining = 0;
            }
            FadeState::FullDisplay => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.state = FadeState::DoingFade;
                    self.remaining = self.config.fade_ticks.max(1);
                    self.scroll_enabled = false;
                    self.schedule(scheduler, self.config.fade_tick());
                } else {
                    self.schedule(scheduler, self.config.full_tick());
                }
            }
            FadeState::DoingFade => {
                self.remaining = self.remaining.saturating_sub(1);
                self.opacity = self.remaining as f32 / self.config.fade_ticks.max(1) as f32;
                if self.remaining == 0 {
                    self.state = FadeState::Done;
                    tracing::debug!("Chat surface faded out");
                } else {
                    self.schedule(scheduler, self.config.fade_tick());
                }
            }
        }
    }

    /// Drop the tick in flight and count down from full on a fresh full tick
    fn restart(&mut self, scheduler: &dyn Scheduler) {
        if !self.config.is_enabled() {
            self.hard_reset();
            return;
        }
        self.generation += 1;
        self.pending = false;
        self.restore();
        self.enter_full_display();
        self.schedule(scheduler, self.config.full_tick());
    }

    fn enter_full_display(&mut self) {
        self.state = FadeState::FullDisplay;
        self.remaining = self.config.full_ticks;
    }

    fn restore(&mut self) {
        self.opacity = 1.0;
        self.scroll_enabled = true;
    }

    fn schedule(&mut self, scheduler: &dyn Scheduler, delay: Duration) {
        self.pending = true;
        scheduler.after(
            delay,
            FadeTick {
                generation: self.generation,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualScheduler;

    fn config() -> FadeConfig {
        FadeConfig {
            full_ticks: 3,
            fade_ticks: 4,
            full_tick_ms: 1000,
            fade_tick_ms: 50,
        }
    }

    fn run_next(machine: &mut FadeMachine, scheduler: &ManualScheduler) {
        let (_, tick) = scheduler.pop().expect("a tick should be pending");
        machine.tick(tick, scheduler);
    }

    #[test]
    fn test_arm_twice_schedules_once() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());

        machine.arm(&scheduler);
        machine.arm(&scheduler);

        assert_eq!(machine.state(), FadeState::FullDisplay);
        assert_eq!(machine.remaining(), 3);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_full_countdown_then_fade_to_done() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);

        run_next(&mut machine, &scheduler);
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.state(), FadeState::FullDisplay);
        assert_eq!(machine.remaining(), 1);

        run_next(&mut machine, &scheduler);
        assert_eq!(machine.state(), FadeState::DoingFade);
        assert_eq!(machine.opacity(), 1.0);
        assert!(!machine.scroll_enabled());
        let (delay, _) = scheduler.peek().unwrap();
        assert_eq!(delay, Duration::from_millis(50));

        run_next(&mut machine, &scheduler);
        assert_eq!(machine.opacity(), 0.75);
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.opacity(), 0.5);
        run_next(&mut machine, &scheduler);
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.state(), FadeState::Done);
        assert_eq!(machine.opacity(), 0.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_reset_mid_fade_restores_opacity() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);
        for _ in 0..4 {
            run_next(&mut machine, &scheduler);
        }
        assert_eq!(machine.state(), FadeState::DoingFade);
        assert!(machine.opacity() < 1.0);

        machine.reset(&scheduler);
        assert_eq!(machine.state(), FadeState::FullDisplay);
        assert_eq!(machine.remaining(), 3);
        assert_eq!(machine.opacity(), 1.0);
        assert!(machine.scroll_enabled());

        // The old fade tick arrives first and is dropped
        assert_eq!(scheduler.pending(), 2);
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.remaining(), 3);
        assert_eq!(machine.opacity(), 1.0);

        // Full display counts down on full ticks again
        let (delay, _) = scheduler.peek().unwrap();
        assert_eq!(delay, Duration::from_millis(1000));
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.state(), FadeState::FullDisplay);
        assert_eq!(machine.remaining(), 2);
    }

    #[test]
    fn test_reset_in_full_display_keeps_single_tick() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.remaining(), 2);

        machine.reset(&scheduler);
        assert_eq!(machine.remaining(), 3);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_arm_does_nothing_while_chatting() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.set_chatting(true, &scheduler);

        machine.arm(&scheduler);
        assert_eq!(machine.state(), FadeState::NotActive);
        assert_eq!(machine.opacity(), 1.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_reset_after_done_rearms() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);
        while scheduler.pending() > 0 {
            run_next(&mut machine, &scheduler);
        }
        assert_eq!(machine.state(), FadeState::Done);

        machine.reset(&scheduler);
        assert_eq!(machine.state(), FadeState::FullDisplay);
        assert_eq!(machine.opacity(), 1.0);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_stop_collapses_on_next_tick() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);
        for _ in 0..4 {
            run_next(&mut machine, &scheduler);
        }

        machine.stop();
        assert_eq!(machine.state(), FadeState::Stopping);

        run_next(&mut machine, &scheduler);
        assert_eq!(machine.state(), FadeState::NotActive);
        assert_eq!(machine.opacity(), 1.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_arm_while_stopping_restarts_on_full_tick() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);
        for _ in 0..4 {
            run_next(&mut machine, &scheduler);
        }
        machine.stop();
        machine.arm(&scheduler);

        assert_eq!(machine.state(), FadeState::FullDisplay);
        assert_eq!(machine.opacity(), 1.0);
        // Stale fade tick, then the fresh full tick
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.remaining(), 3);
        assert_eq!(scheduler.peek().unwrap().0, Duration::from_millis(1000));
    }

    #[test]
    fn test_pinned_panel_never_arms_and_drops_stale_ticks() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);

        machine.set_pinned(true, &scheduler);
        assert_eq!(machine.state(), FadeState::NotActive);
        machine.arm(&scheduler);
        assert_eq!(machine.state(), FadeState::NotActive);

        // The tick from before pinning arrives late and changes nothing
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.state(), FadeState::NotActive);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_unpinning_rearms_once() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);
        machine.set_pinned(true, &scheduler);
        machine.set_pinned(false, &scheduler);

        assert_eq!(machine.state(), FadeState::FullDisplay);
        // One stale tick plus one live tick
        assert_eq!(scheduler.pending(), 2);
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.remaining(), 3);
        run_next(&mut machine, &scheduler);
        assert_eq!(machine.remaining(), 2);
    }

    #[test]
    fn test_reset_ignored_while_chatting() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.set_chatting(true, &scheduler);
        machine.reset(&scheduler);
        assert_eq!(machine.state(), FadeState::NotActive);

        machine.set_chatting(false, &scheduler);
        assert_eq!(machine.state(), FadeState::FullDisplay);
    }

    #[test]
    fn test_zero_full_ticks_disables_fading() {
        let scheduler = ManualScheduler::default();
        let mut machine = FadeMachine::new(config());
        machine.arm(&scheduler);
        machine.set_full_ticks(0);
        assert_eq!(machine.state(), FadeState::NotActive);

        machine.arm(&scheduler);
        machine.reset(&scheduler);
        assert_eq!(machine.state(), FadeState::NotActive);
    }
}
