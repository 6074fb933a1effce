//! Console directive definitions and parsing
//!
//! Lines starting with `:` drive the harness itself; anything else is chat.

use anyhow::{bail, Result};
use kicore::{Addressee, ChatFlags, NamedList};

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Directive(Directive),
}

impl Input {
    pub fn parse(line: &str) -> Result<Self> {
        match line.strip_prefix(':') {
            Some(rest) => Ok(Input::Directive(Directive::parse(rest)?)),
            None => Ok(Input::Chat(line.to_string())),
        }
    }
}

/// How `:select` names its target before the roster resolves it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Player(String),
    List(NamedList),
    InRange,
    None,
}

impl Selection {
    pub fn resolve(&self, find: impl Fn(&str) -> kicore::PlayerIdentity) -> Addressee {
        match self {
            Selection::Player(name) => Addressee::Player(find(name)),
            Selection::List(list) => Addressee::List(*list),
            Selection::InRange => Addressee::InRange,
            Selection::None => Addressee::None,
        }
    }
}

/// Harness directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Change the player-list selection
    Select(Selection),

    /// Simulate an inbound line
    Receive {
        sender: Option<String>,
        text: String,
        wire: u32,
    },

    /// Move to another area
    Area(String),

    /// Mark a player online or offline
    Online { name: String, online: bool },

    /// Open or close the large chat panel
    Pin(bool),

    /// Start or stop typing
    Chatting(bool),

    /// Call off a running fade
    CancelFade,

    /// History recall
    Older,
    Newer,

    /// Show session state
    Status,

    Help,

    Quit,
}

impl Directive {
    /// Parse a directive from the text after `:`
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            bail!("Empty directive");
        }

        match parts[0] {
            "select" => {
                let selection = match parts.get(1..).unwrap_or_default() {
                    ["range"] | ["in-range"] => Selection::InRange,
                    ["none"] => Selection::None,
                    ["list", name] => match NamedList::from_name(name) {
                        Some(list) => Selection::List(list),
                        None => bail!("Unknown list '{}'. Valid options: age, buddies, neighbors, all", name),
                    },
                    ["player", name @ ..] if !name.is_empty() => Selection::Player(name.join(" ")),
                    _ => bail!("Usage: select <range|none|list <name>|player <name>>"),
                };
                Ok(Directive::Select(selection))
            }

            "recv" | "recv-private" => {
                if parts.len() < 3 {
                    bail!("Usage: {} <sender> <text>", parts[0]);
                }
                let flags = if parts[0] == "recv" {
                    ChatFlags::broadcast()
                } else {
                    ChatFlags::private()
                };
                Ok(Directive::Receive {
                    sender: Some(parts[1].to_string()),
                    text: rest_after(input, 2),
                    wire: flags.encode(),
                })
            }

            "recv-raw" => {
                if parts.len() < 4 {
                    bail!("Usage: recv-raw <wire> <sender|-> <text>");
                }
                let Some(wire) = parse_wire(parts[1]) else {
                    bail!("Invalid wire flags '{}'", parts[1]);
                };
                let sender = (parts[2] != "-").then(|| parts[2].to_string());
                Ok(Directive::Receive {
                    sender,
                    text: rest_after(input, 3),
                    wire,
                })
            }

            "area" => {
                if parts.len() < 2 {
                    bail!("Usage: area <name>");
                }
                Ok(Directive::Area(parts[1..].join(" ")))
            }

            "online" | "offline" => {
                if parts.len() < 2 {
                    bail!("Usage: {} <name>", parts[0]);
                }
                Ok(Directive::Online {
                    name: parts[1].to_string(),
                    online: parts[0] == "online",
                })
            }

            "pin" => Ok(Directive::Pin(true)),
            "unpin" => Ok(Directive::Pin(false)),
            "typing" => Ok(Directive::Chatting(true)),
            "idle" => Ok(Directive::Chatting(false)),
            "stopfade" => Ok(Directive::CancelFade),
            "up" => Ok(Directive::Older),
            "down" => Ok(Directive::Newer),
            "status" => Ok(Directive::Status),
            "help" => Ok(Directive::Help),
            "quit" | "exit" => Ok(Directive::Quit),

            _ => {
                bail!("Unknown directive: '{}'", parts[0]);
            }
        }
    }
}

/// Text after the first `n` whitespace-separated words, spacing kept
fn rest_after(input: &str, n: usize) -> String {
    let mut rest = input.trim_start();
    for _ in 0..n {
        rest = rest
            .split_once(char::is_whitespace)
            .map_or("", |(_, tail)| tail)
            .trim_start();
    }
    rest.to_string()
}

fn parse_wire(raw: &str) -> Option<u32> {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Directive reference shown by `:help`
pub const HELP: &[&str] = &[
    "Chat:",
    "  <text>                           Send to the current selection",
    "  /help                            List chat commands",
    "",
    "Directives:",
    "  :select range|none               Send in range",
    "  :select list <age|buddies|neighbors|all>",
    "  :select player <name>            Private to one player",
    "  :recv <name> <text>              Simulate an inbound broadcast",
    "  :recv-private <name> <text>      Simulate an inbound private line",
    "  :recv-raw <wire> <name|-> <text> Inbound line with raw flags",
    "  :area <name>                     Link to another area",
    "  :online|:offline <name>          Change a player's online status",
    "  :pin | :unpin                    Open or close the large panel",
    "  :typing | :idle                  Start or stop typing",
    "  :stopfade                        Cancel a running fade",
    "  :up | :down                      Recall sent lines",
    "  :status                          Show session state",
    "  :quit                            Leave",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(Input::parse("/p Atrus hi").unwrap(), Input::Chat("/p Atrus hi".into()));
    }

    #[test]
    fn test_recv_keeps_spacing() {
        let input = Input::parse(":recv Yeesha  hello   there").unwrap();
        assert_eq!(
            input,
            Input::Directive(Directive::Receive {
                sender: Some("Yeesha".into()),
                text: "hello   there".into(),
                wire: 0,
            })
        );
    }

    #[test]
    fn test_recv_raw_without_sender() {
        let directive = Directive::parse("recv-raw 0x10 - server restarting").unwrap();
        assert_eq!(
            directive,
            Directive::Receive {
                sender: None,
                text: "server restarting".into(),
                wire: 0x10,
            }
        );
    }

    #[test]
    fn test_select_forms() {
        assert_eq!(
            Directive::parse("select list buddies").unwrap(),
            Directive::Select(Selection::List(NamedList::Buddies))
        );
        assert_eq!(
            Directive::parse("select player Atrus Jr").unwrap(),
            Directive::Select(Selection::Player("Atrus Jr".into()))
        );
        assert!(Directive::parse("select list friends").is_err());
        assert!(Directive::parse("select player").is_err());
    }

    #[test]
    fn test_fade_directives() {
        assert_eq!(Directive::parse("stopfade").unwrap(), Directive::CancelFade);
        assert_eq!(Directive::parse("typing").unwrap(), Directive::Chatting(true));
    }

    #[test]
    fn test_unknown_directive() {
        assert!(Directive::parse("frob").is_err());
        assert!(Directive::parse("").is_err());
    }
}
