//! Resolves who a chat line goes to
//!
//! Resolution order, first match wins:
//!
//! 1. reply shortcut (`/r`, `/reply`) to the last private sender
//! 2. explicit private (`/p`, `/private`) to a named player
//! 3. `/neighbors` or `/buddies` to the online part of that list
//! 4. whatever the player list has selected
//!
//! A failure anywhere aborts the whole send.

use crate::error::{ChatError, Result};
use crate::protocol::constants::{ORIGIN_TAG_CLOSE, ORIGIN_TAG_OPEN};
use crate::protocol::ChatFlags;
use crate::services::Directory;
use crate::types::{
    names_match, Addressee, NamedList, PlayerIdentity, RoutingDecision, SelectionContext,
};

/// Addressing overrides typed at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    Reply,
    Private,
    Neighbors,
    Buddies,
}

impl Override {
    fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "/r" | "/reply" => Some(Self::Reply),
            "/p" | "/private" => Some(Self::Private),
            "/neighbors" => Some(Self::Neighbors),
            "/buddies" => Some(Self::Buddies),
            _ => None,
        }
    }

    /// Split a leading override token off `text`
    pub fn parse(text: &str) -> Option<(Self, &str)> {
        let text = text.trim_start();
        let (token, rest) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));
        Self::from_token(token).map(|o| (o, rest.trim_start()))
    }
}

/// One line to route, with the addressing state at the time it was typed
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub text: &'a str,
    pub selection: &'a SelectionContext,
    /// Current area, used in origin tags
    pub area: &'a str,
    pub channel: u8,
    /// Last player who sent us a private line
    pub reply_to: Option<&'a PlayerIdentity>,
}

/// `<<Area>>text`
pub fn tag_origin(area: &str, text: &str) -> String {
    format!("{ORIGIN_TAG_OPEN}{area}{ORIGIN_TAG_CLOSE}{text}")
}

/// Split a leading `<<Origin>>` tag off `text`
pub fn strip_origin(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(ORIGIN_TAG_OPEN)?;
    let (origin, body) = rest.split_once(ORIGIN_TAG_CLOSE)?;
    Some((origin, body))
}

pub fn route(request: &RouteRequest<'_>, directory: &dyn Directory) -> Result<RoutingDecision> {
    let base = ChatFlags::broadcast().with_channel(request.channel);

    let decision = match Override::parse(request.text) {
        Some((Override::Reply, message)) => {
            let target = request.reply_to.ok_or(ChatError::NoReplyTarget)?;
            private_to(request, directory, base, target.clone(), message)?
        }
        Some((Override::Private, rest)) => {
            let (target, message) =
                find_named_player(rest, request.selection, directory).ok_or(ChatError::AddresseeNotFound)?;
            private_to(request, directory, base, target, message)?
        }
        Some((Override::Neighbors, message)) => {
            to_list(request, directory, base, NamedList::Neighbors, message)?
        }
        Some((Override::Buddies, message)) => {
            to_list(request, directory, base, NamedList::Buddies, message)?
        }
        None => to_selection(request, directory, base)?,
    };

    tracing::debug!(
        "Routed to {} recipient(s) with flags 0x{:04X}",
        decision.recipients.len(),
        decision.flags.encode()
    );
    Ok(decision)
}

fn message_text(message: &str) -> Result<&str> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    Ok(message)
}

/// Private line to one player, tagged when they are in another instance
fn private_to(
    request: &RouteRequest<'_>,
    directory: &dyn Directory,
    base: ChatFlags,
    target: PlayerIdentity,
    message: &str,
) -> Result<RoutingDecision> {
    let flags = base.with_private(true);

    if request.selection.is_local(&target) {
        let message = message_text(message)?;
        return Ok(RoutingDecision::new(vec![target], flags, message));
    }

    if !directory.is_online(&target) {
        return Err(ChatError::AddresseeOffline(target.name));
    }

    let message = message_text(message)?;
    Ok(RoutingDecision::new(
        vec![target],
        flags.with_inter_age(true),
        tag_origin(request.area, message),
    ))
}

/// Broadcast to the online part of a list
fn to_list(
    request: &RouteRequest<'_>,
    directory: &dyn Directory,
    base: ChatFlags,
    list: NamedList,
    message: &str,
) -> Result<RoutingDecision> {
    let members = match list {
        NamedList::Buddies => directory.buddies(),
        NamedList::Neighbors => directory.neighbors(),
        NamedList::AgeMembers => request.selection.age_members.clone(),
        NamedList::AllPlayers => Vec::new(),
    };

    if list == NamedList::AgeMembers {
        if members.is_empty() {
            return Err(ChatError::AddresseeOffline(list.to_string()));
        }
        return Ok(RoutingDecision::new(members, base, message_text(message)?));
    }

    let online: Vec<PlayerIdentity> = members
        .into_iter()
        .filter(|p| directory.is_online(p))
        .collect();
    if online.is_empty() {
        return Err(ChatError::AddresseeOffline(list.to_string()));
    }

    let message = message_text(message)?;
    let flags = base
        .with_inter_age(true)
        .with_neighbors(list == NamedList::Neighbors);
    Ok(RoutingDecision::new(online, flags, tag_origin(request.area, message)))
}

fn to_selection(
    request: &RouteRequest<'_>,
    directory: &dyn Directory,
    base: ChatFlags,
) -> Result<RoutingDecision> {
    match &request.selection.addressee {
        Addressee::Player(player) => private_to(request, directory, base, player.clone(), request.text),
        Addressee::List(NamedList::AllPlayers) if directory.all_players_list_requested() => {
            let message = message_text(request.text)?;
            Ok(RoutingDecision::new(Vec::new(), base.with_admin(true), message))
        }
        Addressee::List(NamedList::AllPlayers) => {
            tracing::warn!("All-players list selected but not available; sending in range");
            in_range(request, base)
        }
        Addressee::List(list) => to_list(request, directory, base, *list, request.text),
        Addressee::InRange | Addressee::None => in_range(request, base),
    }
}

fn in_range(request: &RouteRequest<'_>, base: ChatFlags) -> Result<RoutingDecision> {
    let message = message_text(request.text)?;
    Ok(RoutingDecision::new(Vec::new(), base, message))
}

/// Find the player whose name starts `text`, preferring the longest name
///
/// Looks through the local instance first, then buddies, then neighbors.
fn find_named_player<'t>(
    text: &'t str,
    selection: &SelectionContext,
    directory: &dyn Directory,
) -> Option<(PlayerIdentity, &'t str)> {
    let buddies = directory.buddies();
    let neighbors = directory.neighbors();

    selection
        .age_members
        .iter()
        .chain(buddies.iter())
        .chain(neighbors.iter())
        .filter_map(|player| name_prefix(text, &player.name).map(|rest| (player, rest)))
        // max_by_key keeps the last maximum; reverse so earlier lists win ties
        .rev()
        .max_by_key(|(player, _)| player.name.len())
        .map(|(player, rest)| (player.clone(), rest))
}

fn name_prefix<'t>(text: &'t str, name: &str) -> Option<&'t str> {
    if name.is_empty() {
        return None;
    }
    // Same number of characters as the name; byte lengths may differ once folded
    let split = text
        .char_indices()
        .nth(name.chars().count())
        .map_or(text.len(), |(i, _)| i);
    let (head, rest) = text.split_at(split);
    if !names_match(head, name) {
        return None;
    }
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDirectory;

    fn atrus() -> PlayerIdentity {
        PlayerIdentity::new("Atrus", 1)
    }

    fn yeesha() -> PlayerIdentity {
        PlayerIdentity::new("Yeesha", 2)
    }

    fn sirrus() -> PlayerIdentity {
        PlayerIdentity::new("Sirrus", 3)
    }

    fn route_line(
        text: &str,
        selection: &SelectionContext,
        directory: &MemoryDirectory,
        reply_to: Option<&PlayerIdentity>,
    ) -> Result<RoutingDecision> {
        route(
            &RouteRequest {
                text,
                selection,
                area: "Relto",
                channel: 0,
                reply_to,
            },
            directory,
        )
    }

    #[test]
    fn test_in_range_default() {
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        let decision = route_line("hello", &selection, &MemoryDirectory::default(), None).unwrap();
        assert!(decision.recipients.is_empty());
        assert!(decision.is_listener_only());
        assert_eq!(decision.flags, ChatFlags::broadcast());
        assert_eq!(decision.text, "hello");
    }

    #[test]
    fn test_explicit_private_to_local_player() {
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        let decision =
            route_line("/p Atrus let's go", &selection, &MemoryDirectory::default(), None).unwrap();
        assert_eq!(decision.recipients, vec![atrus()]);
        assert_eq!(decision.flags, ChatFlags::private());
        assert_eq!(decision.text, "let's go");
    }

    #[test]
    fn test_explicit_private_prefers_longest_name() {
        let long = PlayerIdentity::new("Atrus Jr", 9);
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus(), long.clone()]);
        let decision =
            route_line("/private atrus jr hi dad", &selection, &MemoryDirectory::default(), None)
                .unwrap();
        assert_eq!(decision.recipients, vec![long]);
        assert_eq!(decision.text, "hi dad");
    }

    #[test]
    fn test_explicit_private_matches_non_ascii_case() {
        let atrus = PlayerIdentity::new("Ätrus", 11);
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus.clone()]);
        let decision =
            route_line("/p ätrus hi", &selection, &MemoryDirectory::default(), None).unwrap();
        assert_eq!(decision.recipients, vec![atrus]);
        assert_eq!(decision.text, "hi");
    }

    #[test]
    fn test_explicit_private_to_remote_buddy_is_tagged() {
        let directory = MemoryDirectory::default().with_buddy(yeesha(), true);
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        let decision = route_line("/p Yeesha where are you", &selection, &directory, None).unwrap();
        assert_eq!(decision.recipients, vec![yeesha()]);
        assert!(decision.flags.is_private() && decision.flags.is_inter_age());
        assert_eq!(decision.text, "<<Relto>>where are you");
    }

    #[test]
    fn test_explicit_private_unknown_player() {
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        let err = route_line("/p Gehn hi", &selection, &MemoryDirectory::default(), None).unwrap_err();
        assert_eq!(err, ChatError::AddresseeNotFound);
    }

    #[test]
    fn test_explicit_private_offline_buddy() {
        let directory = MemoryDirectory::default().with_buddy(yeesha(), false);
        let selection = SelectionContext::default();
        let err = route_line("/p Yeesha hi", &selection, &directory, None).unwrap_err();
        assert_eq!(err, ChatError::AddresseeOffline("Yeesha".into()));
    }

    #[test]
    fn test_private_with_nothing_to_say() {
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        let err = route_line("/p Atrus   ", &selection, &MemoryDirectory::default(), None).unwrap_err();
        assert_eq!(err, ChatError::EmptyMessage);
    }

    #[test]
    fn test_reply_without_sender_fails_regardless_of_text() {
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        for text in ["/r hello", "/r", "/reply anything at all"] {
            let err = route_line(text, &selection, &MemoryDirectory::default(), None).unwrap_err();
            assert_eq!(err, ChatError::NoReplyTarget);
        }
    }

    #[test]
    fn test_reply_to_local_sender() {
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        let decision =
            route_line("/r hello", &selection, &MemoryDirectory::default(), Some(&atrus())).unwrap();
        assert_eq!(decision.recipients, vec![atrus()]);
        assert!(decision.flags.is_private());
        assert!(!decision.flags.is_inter_age());
        assert_eq!(decision.text, "hello");
    }

    #[test]
    fn test_reply_to_remote_sender() {
        let directory = MemoryDirectory::default().with_online(yeesha());
        let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);
        let decision = route_line("/reply ok", &selection, &directory, Some(&yeesha())).unwrap();
        assert!(decision.flags.is_inter_age());
        assert_eq!(decision.text, "<<Relto>>ok");
    }

    #[test]
    fn test_reply_to_vanished_sender() {
        let selection = SelectionContext::default();
        let err = route_line("/r ok", &selection, &MemoryDirectory::default(), Some(&yeesha()))
            .unwrap_err();
        assert_eq!(err, ChatError::AddresseeOffline("Yeesha".into()));
    }

    #[test]
    fn test_buddies_override_sends_to_online_subset() {
        let directory = MemoryDirectory::default()
            .with_buddy(yeesha(), true)
            .with_buddy(sirrus(), false);
        let decision =
            route_line("/buddies hi all", &SelectionContext::default(), &directory, None).unwrap();
        assert_eq!(decision.recipients, vec![yeesha()]);
        assert!(decision.flags.is_broadcast() && decision.flags.is_inter_age());
        assert!(!decision.flags.is_neighbors());
        assert_eq!(decision.text, "<<Relto>>hi all");
    }

    #[test]
    fn test_neighbors_override_all_offline() {
        let directory = MemoryDirectory::default().with_neighbor(sirrus(), false);
        let err =
            route_line("/neighbors party", &SelectionContext::default(), &directory, None).unwrap_err();
        assert_eq!(err, ChatError::AddresseeOffline("Neighbors".into()));
    }

    #[test]
    fn test_neighbors_override_sets_facet() {
        let directory = MemoryDirectory::default().with_neighbor(sirrus(), true);
        let decision =
            route_line("/neighbors party", &SelectionContext::default(), &directory, None).unwrap();
        assert!(decision.flags.is_neighbors() && decision.flags.is_inter_age());
    }

    #[test]
    fn test_selected_player_in_instance() {
        let selection = SelectionContext::new(Addressee::Player(atrus()), vec![atrus()]);
        let decision = route_line("psst", &selection, &MemoryDirectory::default(), None).unwrap();
        assert_eq!(decision.recipients, vec![atrus()]);
        assert_eq!(decision.flags, ChatFlags::private());
    }

    #[test]
    fn test_selected_player_elsewhere() {
        let directory = MemoryDirectory::default().with_online(yeesha());
        let selection = SelectionContext::new(Addressee::Player(yeesha()), vec![atrus()]);
        let decision = route_line("psst", &selection, &directory, None).unwrap();
        assert!(decision.flags.is_inter_age());
        assert_eq!(decision.text, "<<Relto>>psst");
    }

    #[test]
    fn test_all_players_list_is_admin_broadcast() {
        let directory = MemoryDirectory::default().with_all_players_list();
        let selection = SelectionContext::new(Addressee::List(NamedList::AllPlayers), vec![]);
        let decision = route_line("server restart soon", &selection, &directory, None).unwrap();
        assert!(decision.recipients.is_empty());
        assert!(decision.flags.is_admin());
        assert!(!decision.flags.is_inter_age());
        assert_eq!(decision.text, "server restart soon");
    }

    #[test]
    fn test_all_players_list_unavailable_falls_back_to_range() {
        let selection = SelectionContext::new(Addressee::List(NamedList::AllPlayers), vec![]);
        let decision = route_line("hi", &selection, &MemoryDirectory::default(), None).unwrap();
        assert!(decision.is_listener_only());
        assert!(!decision.flags.is_admin());
    }

    #[test]
    fn test_age_members_list() {
        let selection =
            SelectionContext::new(Addressee::List(NamedList::AgeMembers), vec![atrus(), sirrus()]);
        let decision = route_line("hi", &selection, &MemoryDirectory::default(), None).unwrap();
        assert_eq!(decision.recipients, vec![atrus(), sirrus()]);
        assert_eq!(decision.flags, ChatFlags::broadcast());
    }

    #[test]
    fn test_channel_is_stamped() {
        let selection = SelectionContext::default();
        let decision = route(
            &RouteRequest {
                text: "hi",
                selection: &selection,
                area: "Relto",
                channel: 12,
                reply_to: None,
            },
            &MemoryDirectory::default(),
        )
        .unwrap();
        assert_eq!(decision.flags.channel(), 12);
    }

    #[test]
    fn test_origin_tag_roundtrip() {
        let tagged = tag_origin("Kirel", "hello <<not a tag>>");
        assert_eq!(strip_origin(&tagged), Some(("Kirel", "hello <<not a tag>>")));
        assert_eq!(strip_origin("no tag"), None);
        assert_eq!(strip_origin("<<unterminated"), None);
    }
}
