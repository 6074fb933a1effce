//! Command tables
//!
//! Every command the chat line understands is an entry in one of the tables
//! below. A [`CommandRegistry`] is built once per context (area, privilege)
//! and keeps the entries in table precedence order.

use serde::{Deserialize, Serialize};

/// Tables in the order they are consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableKind {
    Localized,
    Area,
    Privileged,
    EasterEgg,
    Extended,
    FixedText,
    Emote,
}

impl TableKind {
    pub const ORDER: [TableKind; 7] = [
        Self::Localized,
        Self::Area,
        Self::Privileged,
        Self::EasterEgg,
        Self::Extended,
        Self::FixedText,
        Self::Emote,
    ];
}

/// What a command does once matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    ClearChat,
    Ignore,
    Unignore,
    StartLog,
    StopLog,
    Afk,
    Fade,
    Channel,
    OpenDialog { dialog: &'static str },
    SetSetting,
    ShowFlags,
    Look,
    Get,
    Listen,
    Me,
    FixedText(&'static str),
    Emote {
        animation: &'static str,
        template: &'static str,
    },
}

/// One command token and how to run it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub token: &'static str,
    pub table: TableKind,
    pub kind: CommandKind,
    /// Positional arguments; the last one takes the rest of the line
    pub arity: usize,
    pub usage: &'static str,
}

impl CommandEntry {
    const fn new(token: &'static str, table: TableKind, kind: CommandKind) -> Self {
        Self {
            token,
            table,
            kind,
            arity: 1,
            usage: token,
        }
    }

    const fn usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }

    const fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }
}

/// Markers the router interprets itself; passed through untouched
pub const ROUTER_MARKERS: &[&str] = &["/r", "/reply", "/p", "/private", "/neighbors", "/buddies"];

const LOCALIZED: &[CommandEntry] = &[
    CommandEntry::new("/help", TableKind::Localized, CommandKind::Help),
    CommandEntry::new("/clearchat", TableKind::Localized, CommandKind::ClearChat),
    CommandEntry::new("/ignore", TableKind::Localized, CommandKind::Ignore).usage("/ignore <player>"),
    CommandEntry::new("/unignore", TableKind::Localized, CommandKind::Unignore)
        .usage("/unignore <player>"),
    CommandEntry::new("/startlog", TableKind::Localized, CommandKind::StartLog),
    CommandEntry::new("/stoplog", TableKind::Localized, CommandKind::StopLog),
    CommandEntry::new("/afk", TableKind::Localized, CommandKind::Afk),
    CommandEntry::new("/fade", TableKind::Localized, CommandKind::Fade).usage("/fade <seconds>"),
    CommandEntry::new("/channel", TableKind::Localized, CommandKind::Channel)
        .usage("/channel [0-255]"),
];

/// (area, entry) pairs; only registered while in that area
const AREA: &[(&str, CommandEntry)] = &[
    (
        "Jalak",
        CommandEntry::new(
            "/savecolumns",
            TableKind::Area,
            CommandKind::OpenDialog {
                dialog: "JalakSaveColumns",
            },
        ),
    ),
    (
        "Jalak",
        CommandEntry::new(
            "/loadcolumns",
            TableKind::Area,
            CommandKind::OpenDialog {
                dialog: "JalakLoadColumns",
            },
        ),
    ),
];

const PRIVILEGED: &[CommandEntry] = &[
    CommandEntry::new("/setsetting", TableKind::Privileged, CommandKind::SetSetting)
        .arity(2)
        .usage("/setsetting <key> <value>"),
    CommandEntry::new("/showflags", TableKind::Privileged, CommandKind::ShowFlags)
        .usage("/showflags <wire flags>"),
    CommandEntry::new(
        "/openkiosk",
        TableKind::Privileged,
        CommandKind::OpenDialog { dialog: "Kiosk" },
    ),
];

const EASTER_EGGS: &[CommandEntry] = &[
    CommandEntry::new("/look", TableKind::EasterEgg, CommandKind::Look),
    CommandEntry::new("/get", TableKind::EasterEgg, CommandKind::Get),
    CommandEntry::new("/listen", TableKind::EasterEgg, CommandKind::Listen),
];

const EXTENDED: &[CommandEntry] =
    &[CommandEntry::new("/me", TableKind::Extended, CommandKind::Me).usage("/me <action>")];

const FIXED_TEXT: &[CommandEntry] = &[
    CommandEntry::new(
        "/xyzzy",
        TableKind::FixedText,
        CommandKind::FixedText("Nothing happens."),
    ),
    CommandEntry::new(
        "/plugh",
        TableKind::FixedText,
        CommandKind::FixedText("A hollow voice says \"Fool.\""),
    ),
];

const fn emote(token: &'static str, animation: &'static str, template: &'static str) -> CommandEntry {
    CommandEntry::new(
        token,
        TableKind::Emote,
        CommandKind::Emote {
            animation,
            template,
        },
    )
}

const EMOTES: &[CommandEntry] = &[
    emote("/wave", "Wave", "{name} waves."),
    emote("/laugh", "Laugh", "{name} laughs."),
    emote("/clap", "Clap", "{name} claps."),
    emote("/dance", "Dance", "{name} dances."),
    emote("/bow", "Bow", "{name} bows."),
    emote("/cheer", "Cheer", "{name} cheers."),
    emote("/cry", "Cry", "{name} cries."),
    emote("/sit", "SitDown", "{name} sits down."),
    emote("/shrug", "Shrug", "{name} shrugs."),
    emote("/yes", "Agree", "{name} nods."),
    emote("/no", "ShakeHead", "{name} shakes their head."),
    emote("/thanks", "Thank", "{name} is thankful."),
    emote("/yawn", "Yawn", "{name} yawns."),
    emote("/point", "Point", "{name} points."),
];

/// Where the commands are being typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    pub area: String,
    pub privileged: bool,
}

/// Commands available in one context, in precedence order
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn build(context: &CommandContext) -> Self {
        let mut entries = Vec::new();

        for table in TableKind::ORDER {
            match table {
                TableKind::Localized => entries.extend_from_slice(LOCALIZED),
                TableKind::Area => entries.extend(
                    AREA.iter()
                        .filter(|(area, _)| area.eq_ignore_ascii_case(&context.area))
                        .map(|(_, entry)| *entry),
                ),
                TableKind::Privileged if context.privileged => {
                    entries.extend_from_slice(PRIVILEGED)
                }
                TableKind::Privileged => {}
                TableKind::EasterEgg => entries.extend_from_slice(EASTER_EGGS),
                TableKind::Extended => entries.extend_from_slice(EXTENDED),
                TableKind::FixedText => entries.extend_from_slice(FIXED_TEXT),
                TableKind::Emote => entries.extend_from_slice(EMOTES),
            }
        }

        tracing::debug!(
            "Built command registry for area {:?} (privileged={}): {} commands",
            context.area,
            context.privileged,
            entries.len()
        );

        Self { entries }
    }

    /// First entry whose token starts `line` on a word boundary, with the rest of the line
    pub fn find<'a>(&self, line: &'a str) -> Option<(&CommandEntry, &'a str)> {
        self.entries.iter().find_map(|entry| {
            split_token(line, entry.token).map(|rest| (entry, rest))
        })
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.iter().any(|e| e.token.eq_ignore_ascii_case(token))
    }
}

/// If `line` begins with `token` (case-folded) followed by a word boundary,
/// return what comes after it
fn split_token<'a>(line: &'a str, token: &str) -> Option<&'a str> {
    let head = line.get(..token.len())?;
    if !head.eq_ignore_ascii_case(token) {
        return None;
    }
    let rest = &line[token.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Whether the first word of `line` is one of the router's markers
pub fn is_router_marker(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|first| ROUTER_MARKERS.iter().any(|m| m.eq_ignore_ascii_case(first)))
}

/// Split `rest` into `arity` whitespace-separated pieces, the last one greedy
///
/// Returns `None` when there are fewer pieces than required.
pub fn split_args(rest: &str, arity: usize) -> Option<Vec<&str>> {
    let mut pieces = Vec::with_capacity(arity);
    let mut remaining = rest.trim();

    for i in 0..arity {
        if remaining.is_empty() {
            return None;
        }
        if i + 1 == arity {
            pieces.push(remaining);
            break;
        }
        match remaining.split_once(char::is_whitespace) {
            Some((piece, tail)) => {
                pieces.push(piece);
                remaining = tail.trim_start();
            }
            None => return None,
        }
    }

    Some(pieces)
}
