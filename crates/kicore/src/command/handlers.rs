//! What each command kind does

use super::table::{split_args, CommandEntry, CommandKind, CommandRegistry};
use crate::protocol::ChatFlags;
use crate::services::Capabilities;
use crate::types::phrases::{render, Phrases};

/// How a handler wants its result shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Shown as a status line
    Status(String),
    /// Status line when `true`, error line when `false`
    Checked(bool, String),
    /// The handler produced no text
    Silent,
}

/// Changes a command makes to the chat session itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SetChannel(u8),
    SetFadeSeconds(u32),
    ClearLog,
}

/// Handler result: what to show, and the chat text left over (if any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub reply: Reply,
    pub residual: Option<String>,
}

impl Handled {
    fn done(reply: Reply) -> Self {
        Self {
            reply,
            residual: None,
        }
    }

    fn with_residual(reply: Reply, residual: impl Into<String>) -> Self {
        Self {
            reply,
            residual: Some(residual.into()),
        }
    }
}

/// Session state visible to handlers
pub struct CommandEnv<'a> {
    pub local_name: &'a str,
    pub area: &'a str,
    pub channel: u8,
    pub phrases: &'a Phrases,
    pub capabilities: &'a dyn Capabilities,
    pub registry: &'a CommandRegistry,
}

impl CommandEnv<'_> {
    fn usage(&self, entry: &CommandEntry) -> Reply {
        Reply::Checked(false, render(&self.phrases.usage, &[("usage", entry.usage)]))
    }
}

/// Run the handler for `entry` with the text that followed its token
pub fn run(
    entry: &CommandEntry,
    rest: &str,
    env: &CommandEnv<'_>,
    effects: &mut Vec<Effect>,
) -> Handled {
    let arg = Some(rest.trim()).filter(|s| !s.is_empty());
    let caps = env.capabilities;
    let phrases = env.phrases;

    match entry.kind {
        CommandKind::Help => {
            let tokens: Vec<&str> = env.registry.entries().iter().map(|e| e.token).collect();
            Handled::done(Reply::Status(format!(
                "{} {}",
                phrases.help_header,
                tokens.join(", ")
            )))
        }

        CommandKind::ClearChat => {
            effects.push(Effect::ClearLog);
            Handled::done(Reply::Silent)
        }

        CommandKind::Ignore | CommandKind::Unignore => {
            let Some(player) = arg else {
                return Handled::done(env.usage(entry));
            };
            let (key, template) = if entry.kind == CommandKind::Ignore {
                ("ignore", &phrases.ignored)
            } else {
                ("unignore", &phrases.unignored)
            };
            caps.change_setting(key, player);
            Handled::done(Reply::Status(render(template, &[("player", player)])))
        }

        CommandKind::StartLog => {
            caps.change_setting("chat.log", "on");
            Handled::done(Reply::Status(phrases.log_started.clone()))
        }

        CommandKind::StopLog => {
            caps.change_setting("chat.log", "off");
            Handled::done(Reply::Status(phrases.log_stopped.clone()))
        }

        CommandKind::Afk => {
            caps.play_animation("AFK");
            caps.change_setting("afk", "on");
            Handled::done(Reply::Status(render(&phrases.afk, &[("name", env.local_name)])))
        }

        CommandKind::Fade => match arg.and_then(|a| a.parse::<u32>().ok()) {
            Some(seconds) => {
                effects.push(Effect::SetFadeSeconds(seconds));
                let seconds_text = seconds.to_string();
                caps.change_setting("chat.fade_seconds", &seconds_text);
                let text = if seconds == 0 {
                    phrases.fade_disabled.clone()
                } else {
                    render(&phrases.fade_set, &[("seconds", seconds_text.as_str())])
                };
                Handled::done(Reply::Checked(true, text))
            }
            None => Handled::done(env.usage(entry)),
        },

        CommandKind::Channel => match arg {
            None => {
                let channel = env.channel.to_string();
                Handled::done(Reply::Status(render(
                    &phrases.channel_current,
                    &[("channel", channel.as_str())],
                )))
            }
            Some(raw) => match raw.parse::<u8>() {
                Ok(channel) => {
                    effects.push(Effect::SetChannel(channel));
                    Handled::done(Reply::Checked(
                        true,
                        render(&phrases.channel_set, &[("channel", raw)]),
                    ))
                }
                Err(_) => Handled::done(env.usage(entry)),
            },
        },

        CommandKind::OpenDialog { dialog } => {
            caps.open_sub_dialog(dialog);
            Handled::done(Reply::Silent)
        }

        CommandKind::SetSetting => match split_args(rest, entry.arity).as_deref() {
            Some(&[key, value]) => {
                caps.change_setting(key, value);
                Handled::done(Reply::Checked(
                    true,
                    render(&phrases.setting_changed, &[("key", key), ("value", value)]),
                ))
            }
            _ => Handled::done(env.usage(entry)),
        },

        CommandKind::ShowFlags => match arg.and_then(parse_wire) {
            Some(wire) => Handled::done(Reply::Status(describe_flags(ChatFlags::decode(wire)))),
            None => Handled::done(env.usage(entry)),
        },

        CommandKind::Look => Handled::done(Reply::Status(look_text(env.area).to_string())),

        CommandKind::Get => Handled::done(match arg {
            Some(thing) => Reply::Checked(false, format!("You can't take the {thing}.")),
            None => Reply::Checked(false, "Get what?".to_string()),
        }),

        CommandKind::Listen => {
            Handled::done(Reply::Status("You hear the wind, and nothing else.".to_string()))
        }

        CommandKind::Me => match arg {
            Some(action) => {
                Handled::with_residual(Reply::Silent, format!("{} {}", env.local_name, action))
            }
            None => Handled::done(env.usage(entry)),
        },

        CommandKind::FixedText(text) => Handled::done(Reply::Status(text.to_string())),

        CommandKind::Emote {
            animation,
            template,
        } => {
            caps.play_animation(animation);
            let template = phrases
                .emotes
                .get(entry.token)
                .map(String::as_str)
                .unwrap_or(template);
            let line = render(template, &[("name", env.local_name)]);
            Handled::with_residual(Reply::Status(line), rest.trim())
        }
    }
}

fn parse_wire(raw: &str) -> Option<u32> {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Human-readable list of the set facets
pub fn describe_flags(flags: ChatFlags) -> String {
    let mut parts = vec![if flags.is_private() { "private" } else { "broadcast" }];
    let facets = [
        (flags.is_admin(), "admin"),
        (flags.is_ccr_broadcast(), "ccr"),
        (flags.is_inter_age(), "interAge"),
        (flags.is_status(), "status"),
        (flags.is_neighbors(), "neighbors"),
        (flags.is_audio_subtitle(), "subtitle"),
        (flags.is_loc_key(), "locKey"),
    ];
    parts.extend(facets.iter().filter(|(set, _)| *set).map(|(_, name)| *name));
    format!("{}, channel {}", parts.join(", "), flags.channel())
}

fn look_text(area: &str) -> &'static str {
    match area.to_lowercase().as_str() {
        "relto" => "You see a small island floating in the clouds.",
        "cleft" => "You see a dusty fissure in the desert.",
        "jalak" => "You see a field of columns waiting to be moved.",
        _ => "You see nothing special.",
    }
}
