//! Text rendering of chat log events

use chrono::{DateTime, Local};
use kicore::types::{Category, ChatLine, ContextPrefix, Presentation};
use kicore::DisplayEvent;

/// One printable log entry
pub fn render_event(event: &DisplayEvent, at: DateTime<Local>) -> String {
    match event {
        DisplayEvent::Line(line) => render_line(line, at),
        DisplayEvent::ClearLog => "--- chat log cleared ---".to_string(),
    }
}

pub fn render_line(line: &ChatLine, at: DateTime<Local>) -> String {
    let mut out = format!("[{}] ", at.format("%H:%M"));

    if line.presentation == Presentation::Mention {
        out.push_str("(!) ");
    }

    match line.category {
        Category::Status => out.push_str("* "),
        Category::Error => out.push_str("! "),
        Category::Subtitle => out.push_str("~ "),
        _ => {}
    }

    if let Some(prefix) = line.prefix {
        out.push_str(prefix_label(prefix));
        out.push(' ');
    }

    if let Some(sender) = &line.sender {
        out.push_str(&sender.name);
        if let Some(origin) = &sender.origin {
            out.push_str(&format!(" ({origin})"));
        }
        out.push_str(": ");
    }

    out.push_str(&line.text);
    out
}

fn prefix_label(prefix: ContextPrefix) -> &'static str {
    match prefix {
        ContextPrefix::PrivateFrom => "From",
        ContextPrefix::PrivateTo => "To",
        ContextPrefix::Neighbors => "[Neighbors]",
        ContextPrefix::Buddies => "[Buddies]",
        ContextPrefix::Global => "[Global]",
    }
}
