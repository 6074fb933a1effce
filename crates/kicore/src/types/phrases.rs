//! Localizable phrases
//!
//! Templates use `{name}`-style placeholders filled by [`render`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Phrases {
    pub afk: String,
    pub log_started: String,
    pub log_stopped: String,
    pub ignored: String,
    pub unignored: String,
    pub channel_set: String,
    pub channel_current: String,
    pub fade_set: String,
    pub fade_disabled: String,
    pub setting_changed: String,
    pub usage: String,
    pub help_header: String,
    /// Per-emote overrides of the third-person line, keyed by command token
    pub emotes: BTreeMap<String, String>,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            afk: "{name} is away from the keyboard.".to_string(),
            log_started: "Chat logging started.".to_string(),
            log_stopped: "Chat logging stopped.".to_string(),
            ignored: "You are now ignoring {player}.".to_string(),
            unignored: "You are no longer ignoring {player}.".to_string(),
            channel_set: "Chat channel set to {channel}.".to_string(),
            channel_current: "You are on chat channel {channel}.".to_string(),
            fade_set: "Chat will fade after {seconds} seconds.".to_string(),
            fade_disabled: "Chat fading disabled.".to_string(),
            setting_changed: "{key} set to {value}.".to_string(),
            usage: "Usage: {usage}".to_string(),
            help_header: "Available commands:".to_string(),
            emotes: BTreeMap::new(),
        }
    }
}

/// Fill `{key}` placeholders in `template`
///
/// Substituted values are copied as-is, never scanned for placeholders.
pub fn render(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let filled = tail[1..].find('}').and_then(|close| {
            let key = &tail[1..=close];
            args.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close + 2))
        });
        match filled {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
