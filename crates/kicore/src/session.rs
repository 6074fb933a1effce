//! One player's chat state and the pipeline that drives it
//!
//! A typed line goes through the command dispatcher, then the router; the
//! routed line is handed to the transport and echoed locally through the
//! classifier. Inbound lines are classified and may force the surface
//! visible. Every chat event feeds the fade machine.

use crate::classify::classify;
use crate::command::{dispatch, CommandContext, CommandEnv, CommandRegistry, Effect, ParsedCommand};
use crate::config::ChatConfig;
use crate::fade::{FadeMachine, FadeTick};
use crate::history::{RecentPlayers, SentHistory};
use crate::mention::MentionDetector;
use crate::protocol::ChatFlags;
use crate::router::{route, RouteRequest};
use crate::services::Services;
use crate::types::{
    Category, ChatLine, DisplayEvent, Phrases, PlayerIdentity, RoutingDecision, SelectionContext,
};

pub struct ChatSession {
    services: Services,
    config: ChatConfig,
    local: PlayerIdentity,
    area: String,
    privileged: bool,
    registry: CommandRegistry,
    mentions: MentionDetector,
    phrases: Phrases,
    history: SentHistory,
    recents: RecentPlayers,
    /// Last player who sent us a private line
    reply_to: Option<PlayerIdentity>,
    channel: u8,
    fade: FadeMachine,
}

impl ChatSession {
    pub fn new(services: Services, local: PlayerIdentity, config: ChatConfig) -> Self {
        let area = String::new();
        let registry = CommandRegistry::build(&CommandContext {
            area: area.clone(),
            privileged: false,
        });

        Self {
            mentions: MentionDetector::new(&local.name),
            history: SentHistory::new(config.history_capacity),
            recents: RecentPlayers::new(config.recents_capacity),
            fade: FadeMachine::new(config.fade.clone()),
            phrases: Phrases::default(),
            reply_to: None,
            channel: 0,
            privileged: false,
            services,
            config,
            local,
            area,
            registry,
        }
    }

    pub fn with_phrases(mut self, phrases: Phrases) -> Self {
        self.phrases = phrases;
        self
    }

    pub fn with_privileged(mut self, privileged: bool) -> Self {
        self.privileged = privileged;
        self.rebuild_registry();
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.set_area(area);
        self
    }

    /// Handle one line the local player typed
    ///
    /// Returns what should appear in the local chat log.
    pub fn submit(&mut self, line: &str, selection: &SelectionContext) -> Vec<DisplayEvent> {
        self.history.record(line);
        let events = self.process(line, selection);
        self.fade.reset(self.services.scheduler.as_ref());
        events
    }

    fn process(&mut self, line: &str, selection: &SelectionContext) -> Vec<DisplayEvent> {
        let dispatched = {
            let env = CommandEnv {
                local_name: &self.local.name,
                area: &self.area,
                channel: self.channel,
                phrases: &self.phrases,
                capabilities: self.services.capabilities.as_ref(),
                registry: &self.registry,
            };
            dispatch(line, &env)
        };

        let mut events = dispatched.events;
        for effect in dispatched.effects {
            self.apply(effect, &mut events);
        }

        let text = match dispatched.outcome {
            ParsedCommand::Residual(text) => text,
            ParsedCommand::Consumed | ParsedCommand::Rejected(_) => return events,
        };

        let request = RouteRequest {
            text: &text,
            selection,
            area: &self.area,
            channel: self.channel,
            reply_to: self.reply_to.as_ref(),
        };
        match route(&request, self.services.directory.as_ref()) {
            Ok(decision) => events.push(self.deliver(decision).into()),
            Err(err) if err.is_silent() => {
                tracing::debug!("Nothing to send: {}", err);
            }
            Err(err) => {
                tracing::warn!("Chat line not sent: {}", err);
                events.push(ChatLine::error(err.to_string()).into());
            }
        }
        events
    }

    fn apply(&mut self, effect: Effect, events: &mut Vec<DisplayEvent>) {
        match effect {
            Effect::SetChannel(channel) => {
                tracing::debug!("Chat channel {} -> {}", self.channel, channel);
                self.channel = channel;
            }
            Effect::SetFadeSeconds(seconds) => {
                let ticks = self.fade.config().ticks_for_seconds(seconds);
                self.fade.set_full_ticks(ticks);
                self.config.fade.full_ticks = ticks;
            }
            Effect::ClearLog => events.push(DisplayEvent::ClearLog),
        }
    }

    /// Send a routed line and build its local echo
    fn deliver(&mut self, decision: RoutingDecision) -> ChatLine {
        tracing::info!(
            "Sending chat to {} recipient(s), flags 0x{:04X}",
            decision.recipients.len(),
            decision.flags.encode()
        );
        self.services
            .transport
            .send(&decision.recipients, &decision.text, decision.flags);

        // A private echo is labelled with who it went to
        let label = match decision.recipients.first() {
            Some(target) if decision.flags.is_private() => {
                self.recents.touch(target);
                target.clone()
            }
            _ => self.local.clone(),
        };

        classify(
            Some(&label),
            &decision.text,
            decision.flags.with_to_self(true),
            &self.mentions,
        )
    }

    /// Handle one line from the network
    ///
    /// Lines from ignored players produce nothing.
    pub fn receive(
        &mut self,
        sender: Option<&PlayerIdentity>,
        text: &str,
        wire_flags: u32,
    ) -> Option<DisplayEvent> {
        if let Some(player) = sender.filter(|p| self.services.directory.is_ignored(p)) {
            tracing::debug!("Dropping chat from ignored player {}", player);
            return None;
        }

        let flags = ChatFlags::decode(wire_flags);
        let line = classify(sender, text, flags, &self.mentions);

        let private = matches!(line.category, Category::Private | Category::AdminPrivate);
        if let Some(player) = sender.filter(|_| private) {
            self.reply_to = Some(player.clone());
            self.recents.touch(player);
        }

        if line.force_visible {
            self.fade.hard_reset();
        }
        self.fade.reset(self.services.scheduler.as_ref());

        Some(line.into())
    }

    /// Deliver a tick the scheduler was asked for
    pub fn on_fade_tick(&mut self, tick: FadeTick) {
        self.fade.tick(tick, self.services.scheduler.as_ref());
    }

    /// Ask a running fade to give up; the surface comes back on the next tick
    pub fn cancel_fade(&mut self) {
        self.fade.stop();
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.fade.set_pinned(pinned, self.services.scheduler.as_ref());
    }

    pub fn set_chatting(&mut self, chatting: bool) {
        self.fade.set_chatting(chatting, self.services.scheduler.as_ref());
    }

    pub fn set_local_player(&mut self, local: PlayerIdentity) {
        self.mentions = MentionDetector::new(&local.name);
        self.local = local;
    }

    pub fn set_area(&mut self, area: impl Into<String>) {
        self.area = area.into();
        self.rebuild_registry();
    }

    fn rebuild_registry(&mut self) {
        self.registry = CommandRegistry::build(&CommandContext {
            area: self.area.clone(),
            privileged: self.privileged,
        });
    }

    pub fn recall_older(&mut self) -> Option<&str> {
        self.history.recall_older()
    }

    pub fn recall_newer(&mut self) -> Option<&str> {
        self.history.recall_newer()
    }

    pub fn local_player(&self) -> &PlayerIdentity {
        &self.local
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn reply_target(&self) -> Option<&PlayerIdentity> {
        self.reply_to.as_ref()
    }

    pub fn history(&self) -> &SentHistory {
        &self.history
    }

    pub fn recents(&self) -> &RecentPlayers {
        &self.recents
    }

    pub fn fade(&self) -> &FadeMachine {
        &self.fade
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}
