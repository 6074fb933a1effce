//! Detects the local player's name inside chat text

use regex::{Regex, RegexBuilder};

/// Matches the local player's name, ignoring hits inside URLs
///
/// The name must stand on its own: preceded by the start of the text,
/// whitespace or punctuation, and followed by the end, whitespace or
/// punctuation, so "Atrus Atrus" is a hit as well. Hits whose token begins
/// with `//` or with a `word.` run (`https://Atrus.net`, `www.Atrus.net`) are
/// rejected.
#[derive(Debug, Clone)]
pub struct MentionDetector {
    pattern: Option<Regex>,
}

impl MentionDetector {
    pub fn new(player_name: &str) -> Self {
        let name = player_name.trim();
        if name.is_empty() {
            return Self { pattern: None };
        }

        let pattern = RegexBuilder::new(&regex::escape(name))
            .case_insensitive(true)
            .build()
            .map_err(|e| tracing::warn!("Mention pattern for {:?} rejected: {}", name, e))
            .ok();

        Self { pattern }
    }

    /// Whether `text` mentions the player
    pub fn matches(&self, text: &str) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };

        // Overlapping candidates matter: "neoAtrus Atrus" must still hit
        let mut from = 0;
        while let Some(m) = pattern.find_at(text, from) {
            if opens_cleanly(&text[..m.start()]) && closes_cleanly(&text[m.end()..]) {
                return true;
            }
            from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        false
    }
}

fn is_separator(c: char) -> bool {
    !c.is_alphanumeric() && c != '_'
}

fn opens_cleanly(before: &str) -> bool {
    match before.chars().next_back() {
        None => true,
        Some(c) if !is_separator(c) => false,
        Some(_) => !inside_url(before),
    }
}

fn closes_cleanly(after: &str) -> bool {
    after.chars().next().is_none_or(is_separator)
}

/// Looks at the token running up to the match
fn inside_url(before: &str) -> bool {
    let token = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default();

    if token.contains("//") {
        return true;
    }

    // `word.` directly ahead of the name
    match token.strip_suffix('.') {
        Some(head) => head
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_'),
        None => false,
    }
}
