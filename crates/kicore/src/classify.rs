//! Maps a chat line to a presentation category

use crate::mention::MentionDetector;
use crate::protocol::ChatFlags;
use crate::router::strip_origin;
use crate::types::{Category, ChatLine, ContextPrefix, PlayerIdentity, Presentation, SenderLabel};

/// Category implied by the flags alone
///
/// A line with no sender that is neither a subtitle nor a status line is a
/// system error.
pub fn category_for(sender: Option<&PlayerIdentity>, flags: ChatFlags) -> Category {
    if flags.is_audio_subtitle() {
        Category::Subtitle
    } else if flags.is_status() {
        Category::Status
    } else if sender.is_none() {
        Category::Error
    } else if flags.is_admin() {
        if flags.is_private() {
            Category::AdminPrivate
        } else {
            Category::AdminBroadcast
        }
    } else if flags.is_ccr_broadcast() {
        Category::CcrBroadcast
    } else if flags.is_private() {
        Category::Private
    } else if flags.is_neighbors() {
        Category::NeighborsBroadcast
    } else if flags.is_inter_age() {
        Category::BuddiesBroadcast
    } else {
        Category::Broadcast
    }
}

fn prefix_for(category: Category, to_self: bool) -> Option<ContextPrefix> {
    match category {
        Category::Private | Category::AdminPrivate if to_self => Some(ContextPrefix::PrivateTo),
        Category::Private | Category::AdminPrivate => Some(ContextPrefix::PrivateFrom),
        Category::NeighborsBroadcast => Some(ContextPrefix::Neighbors),
        Category::BuddiesBroadcast => Some(ContextPrefix::Buddies),
        Category::AdminBroadcast | Category::CcrBroadcast => Some(ContextPrefix::Global),
        _ => None,
    }
}

/// Classify one line
///
/// For the local echo of a private line (`to_self`), `sender` is the
/// recipient, so the label reads "To: <recipient>".
pub fn classify(
    sender: Option<&PlayerIdentity>,
    text: &str,
    flags: ChatFlags,
    mentions: &MentionDetector,
) -> ChatLine {
    let to_self = flags.is_to_self();
    let category = category_for(sender, flags);

    let (origin, text) = match strip_origin(text) {
        Some((origin, body)) if flags.is_inter_age() && !to_self => (Some(origin), body),
        _ => (None, text),
    };

    let mention = !to_self && category.is_broadcast_like() && mentions.matches(text);
    let force_visible = mention
        || (!to_self
            && matches!(
                category,
                Category::Private
                    | Category::AdminPrivate
                    | Category::AdminBroadcast
                    | Category::CcrBroadcast
            ));

    ChatLine {
        category,
        prefix: prefix_for(category, to_self),
        presentation: if mention {
            Presentation::Mention
        } else {
            Presentation::Normal
        },
        sender: sender.map(|p| SenderLabel {
            name: p.name.clone(),
            origin: origin.map(str::to_string),
        }),
        text: text.to_string(),
        force_visible,
    }
}
