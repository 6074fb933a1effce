//! Interactive chat console

mod directives;
mod render;

pub use directives::{Directive, Input, Selection, HELP};
pub use render::{render_event, render_line};

use crate::services::{ConsoleCapabilities, Event, LoggingTransport, Roster, TokioScheduler};
use crate::Config;
use anyhow::Result;
use kicore::{ChatSession, DisplayEvent, FadeState, PlayerIdentity, Scheduler, SelectionContext, Services};
use std::rc::Rc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// What handling one input produced
#[derive(Debug, Default)]
pub struct Reaction {
    /// Chat log output
    pub events: Vec<DisplayEvent>,
    /// Console-only notes
    pub notes: Vec<String>,
    pub quit: bool,
}

impl Reaction {
    fn note(text: impl Into<String>) -> Self {
        Self {
            notes: vec![text.into()],
            ..Self::default()
        }
    }
}

/// A chat session wired to the configured roster
pub struct Console {
    session: ChatSession,
    roster: Rc<Roster>,
    transport: Rc<LoggingTransport>,
    selection: Selection,
}

impl Console {
    pub fn new(config: &Config, scheduler: Rc<dyn Scheduler>) -> Self {
        let roster = Rc::new(Roster::new(config.roster.clone()));
        let transport = Rc::new(LoggingTransport::default());
        let services = Services {
            directory: roster.clone(),
            transport: transport.clone(),
            scheduler,
            capabilities: Rc::new(ConsoleCapabilities::new(roster.clone())),
        };

        let session = ChatSession::new(services, config.local_player(), config.chat.clone())
            .with_phrases(config.phrases.clone())
            .with_privileged(config.player.privileged)
            .with_area(config.area.name.clone());

        Self {
            session,
            roster,
            transport,
            selection: Selection::InRange,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn sent(&self) -> usize {
        self.transport.sent()
    }

    fn selection_context(&self) -> SelectionContext {
        let roster = &self.roster;
        SelectionContext::new(
            self.selection.resolve(|name| roster.find(name)),
            roster.age_members(),
        )
    }

    pub fn handle(&mut self, input: Input) -> Reaction {
        match input {
            Input::Chat(line) => {
                let selection = self.selection_context();
                Reaction {
                    events: self.session.submit(&line, &selection),
                    ..Reaction::default()
                }
            }
            Input::Directive(directive) => self.handle_directive(directive),
        }
    }

    fn handle_directive(&mut self, directive: Directive) -> Reaction {
        match directive {
            Directive::Select(selection) => {
                self.selection = selection;
                let addressee = self.selection_context().addressee;
                Reaction::note(format!("Selected {addressee:?}"))
            }

            Directive::Receive { sender, text, wire } => {
                let sender: Option<PlayerIdentity> = sender.map(|name| self.roster.find(&name));
                Reaction {
                    events: self
                        .session
                        .receive(sender.as_ref(), &text, wire)
                        .into_iter()
                        .collect(),
                    ..Reaction::default()
                }
            }

            Directive::Area(area) => {
                self.session.set_area(area);
                Reaction::note(format!("Linked to {}", self.session.area()))
            }

            Directive::Online { name, online } => {
                self.roster.set_online(&name, online);
                let state = if online { "online" } else { "offline" };
                Reaction::note(format!("{name} is now {state}"))
            }

            Directive::Pin(pinned) => {
                self.session.set_pinned(pinned);
                Reaction::default()
            }

            Directive::Chatting(chatting) => {
                self.session.set_chatting(chatting);
                Reaction::default()
            }

            Directive::CancelFade => {
                self.session.cancel_fade();
                Reaction::default()
            }

            Directive::Older => recalled(self.session.recall_older()),
            Directive::Newer => recalled(self.session.recall_newer()),

            Directive::Status => Reaction {
                notes: self.status_lines(),
                ..Reaction::default()
            },

            Directive::Help => Reaction {
                notes: HELP.iter().map(|line| line.to_string()).collect(),
                ..Reaction::default()
            },

            Directive::Quit => Reaction {
                quit: true,
                ..Reaction::default()
            },
        }
    }

    /// Feed a scheduler event back into the session
    pub fn handle_event(&mut self, event: Event) -> Vec<String> {
        match event {
            Event::Fade(tick) => {
                let before = self.session.fade().state();
                self.session.on_fade_tick(tick);
                let after = self.session.fade().state();
                match (before, after) {
                    (FadeState::FullDisplay, FadeState::DoingFade) => vec!["(chat fading)".to_string()],
                    (FadeState::DoingFade, FadeState::Done) => vec!["(chat hidden)".to_string()],
                    (FadeState::Stopping, FadeState::NotActive) => vec!["(chat restored)".to_string()],
                    _ => Vec::new(),
                }
            }
        }
    }

    fn status_lines(&self) -> Vec<String> {
        let session = &self.session;
        let fade = session.fade();
        let reply = session
            .reply_target()
            .map_or_else(|| "nobody".to_string(), |p| p.to_string());
        let recents: Vec<String> = session.recents().iter().map(|p| p.to_string()).collect();
        vec![
            format!("Player:    {}", session.local_player()),
            format!("Area:      {}", session.area()),
            format!("Channel:   {}", session.channel()),
            format!("Selection: {:?}", self.selection_context().addressee),
            format!("Reply to:  {reply}"),
            format!("Recents:   {}", recents.join(", ")),
            format!("History:   {} line(s)", session.history().len()),
            format!("Sent:      {}", self.sent()),
            format!(
                "Fade:      {:?} ({} left, opacity {:.2})",
                fade.state(),
                fade.remaining(),
                fade.opacity()
            ),
        ]
    }
}

fn recalled(line: Option<&str>) -> Reaction {
    Reaction::note(match line {
        Some(line) => format!("> {line}"),
        None => "(no more history)".to_string(),
    })
}

fn print_reaction(reaction: &Reaction) {
    let now = chrono::Local::now();
    for event in &reaction.events {
        println!("{}", render_event(event, now));
    }
    for note in &reaction.notes {
        println!("{note}");
    }
}

/// Run the interactive console loop
pub async fn run_console(config: Config) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(&config, Rc::new(TokioScheduler::new(tx)));
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("\n=== KI Chat Console ===");
    println!("Chatting as {} in {}", config.player.name, config.area.name);
    println!("Type ':help' for directives, '/help' for chat commands");
    println!();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("\nEOF detected, leaving...");
                    break;
                };
                let input = match Input::parse(line.trim_end()) {
                    Ok(input) => input,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        continue;
                    }
                };
                let reaction = console.handle(input);
                print_reaction(&reaction);
                if reaction.quit {
                    break;
                }
            }
            Some(event) = rx.recv() => {
                for note in console.handle_event(event) {
                    println!("{note}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nInterrupted, leaving...");
                break;
            }
        }
    }

    tracing::info!("Console closed after {} send(s)", console.sent());
    Ok(())
}
