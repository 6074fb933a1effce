//! End-to-end tests for the chat pipeline

use kicore::testing::{ManualScheduler, MemoryDirectory, RecordingCapabilities, RecordingTransport};
use kicore::types::{Category, ContextPrefix, SenderLabel};
use kicore::{
    Addressee, ChatConfig, ChatFlags, ChatSession, DisplayEvent, FadeState, NamedList,
    PlayerIdentity, SelectionContext, Services,
};
use std::rc::Rc;

struct Harness {
    transport: Rc<RecordingTransport>,
    scheduler: Rc<ManualScheduler>,
    capabilities: Rc<RecordingCapabilities>,
    session: ChatSession,
}

fn harness_with(directory: MemoryDirectory, config: ChatConfig) -> Harness {
    let transport = Rc::new(RecordingTransport::default());
    let scheduler = Rc::new(ManualScheduler::default());
    let capabilities = Rc::new(RecordingCapabilities::default());
    let services = Services {
        directory: Rc::new(directory),
        transport: transport.clone(),
        scheduler: scheduler.clone(),
        capabilities: capabilities.clone(),
    };
    let session = ChatSession::new(services, PlayerIdentity::new("Sharper", 100), config)
        .with_area("Kirel");
    Harness {
        transport,
        scheduler,
        capabilities,
        session,
    }
}

fn harness() -> Harness {
    harness_with(MemoryDirectory::default(), ChatConfig::default())
}

fn atrus() -> PlayerIdentity {
    PlayerIdentity::new("Atrus", 1)
}

fn lines(events: &[DisplayEvent]) -> Vec<Category> {
    events
        .iter()
        .filter_map(DisplayEvent::as_line)
        .map(|l| l.category)
        .collect()
}

#[test]
fn test_in_range_broadcast() {
    let mut h = harness();
    let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);

    let events = h.session.submit("hello", &selection);

    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].recipients.is_empty());
    assert_eq!(sent[0].flags, ChatFlags::broadcast());
    assert_eq!(sent[0].text, "hello");

    let echo = events[0].as_line().unwrap();
    assert_eq!(echo.category, Category::Broadcast);
    assert_eq!(echo.sender.as_ref().unwrap().name, "Sharper");
    assert!(!echo.force_visible);
}

#[test]
fn test_private_to_age_member() {
    let mut h = harness();
    let selection = SelectionContext::new(Addressee::InRange, vec![atrus()]);

    let events = h.session.submit("/p Atrus let's go", &selection);

    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipients, vec![atrus()]);
    assert_eq!(sent[0].flags, ChatFlags::private());
    assert_eq!(sent[0].text, "let's go");

    let echo = events[0].as_line().unwrap();
    assert_eq!(echo.category, Category::Private);
    assert_eq!(echo.prefix, Some(ContextPrefix::PrivateTo));
    assert_eq!(h.session.recents().iter().next(), Some(&atrus()));
}

#[test]
fn test_bare_emote_sends_nothing() {
    let mut h = harness();

    let events = h.session.submit("/wave", &SelectionContext::default());

    assert_eq!(h.capabilities.animations(), vec!["Wave".to_string()]);
    assert_eq!(lines(&events), vec![Category::Status]);
    assert!(h.transport.sent().is_empty());
}

#[test]
fn test_whitespace_is_consumed_silently() {
    let mut h = harness();

    let events = h.session.submit("   ", &SelectionContext::default());

    assert!(events.is_empty());
    assert!(h.transport.sent().is_empty());
    assert!(h.session.history().is_empty());
}

#[test]
fn test_reply_precedence() {
    let mut h = harness();
    let selection = SelectionContext::new(Addressee::List(NamedList::Buddies), vec![atrus()]);

    let events = h.session.submit("/r hello", &selection);
    assert_eq!(lines(&events), vec![Category::Error]);
    assert_eq!(events[0].as_line().unwrap().text, "No one to reply to");
    assert!(h.transport.sent().is_empty());

    h.session
        .receive(Some(&atrus()), "are you there?", ChatFlags::private().encode())
        .unwrap();
    h.session.submit("/r hello", &selection);

    let sent = h.transport.last().unwrap();
    assert_eq!(sent.recipients, vec![atrus()]);
    assert!(sent.flags.is_private());
    assert!(!sent.flags.is_inter_age());
    assert_eq!(sent.text, "hello");
}

#[test]
fn test_inbound_inter_age_private() {
    let mut h = harness();
    let yeesha = PlayerIdentity::new("Yeesha", 2);
    let wire = ChatFlags::private().with_inter_age(true).encode();

    let event = h
        .session
        .receive(Some(&yeesha), "<<Relto>>meet me in the cleft", wire)
        .unwrap();

    let line = event.as_line().unwrap();
    assert_eq!(line.category, Category::Private);
    assert_eq!(line.prefix, Some(ContextPrefix::PrivateFrom));
    assert_eq!(
        line.sender,
        Some(SenderLabel {
            name: "Yeesha".into(),
            origin: Some("Relto".into())
        })
    );
    assert_eq!(line.text, "meet me in the cleft");
    assert!(line.force_visible);
}

#[test]
fn test_unknown_command_keeps_history() {
    let mut h = harness();

    let events = h.session.submit("/frobnicate", &SelectionContext::default());

    assert_eq!(events[0].as_line().unwrap().text, "Unknown command: /frobnicate");
    assert!(h.transport.sent().is_empty());
    assert_eq!(h.session.recall_older(), Some("/frobnicate"));
}

#[test]
fn test_history_is_bounded() {
    let config = ChatConfig {
        history_capacity: 3,
        ..ChatConfig::default()
    };
    let mut h = harness_with(MemoryDirectory::default(), config);

    for i in 0..5 {
        h.session.submit(&format!("line {i}"), &SelectionContext::default());
    }

    let entries: Vec<&str> = h.session.history().entries().collect();
    assert_eq!(entries, vec!["line 4", "line 3", "line 2"]);
}

#[test]
fn test_traffic_burst_schedules_one_countdown() {
    let mut h = harness();
    let from = PlayerIdentity::new("Kodama", 7);

    for _ in 0..3 {
        h.session
            .receive(Some(&from), "chatter", ChatFlags::broadcast().encode())
            .unwrap();
    }

    assert_eq!(h.session.fade().state(), FadeState::FullDisplay);
    assert_eq!(h.scheduler.pending(), 1);
}

#[test]
fn test_surface_fades_out_and_typing_restores_it() {
    let config = ChatConfig {
        fade: kicore::FadeConfig {
            full_ticks: 2,
            fade_ticks: 2,
            ..kicore::FadeConfig::default()
        },
        ..ChatConfig::default()
    };
    let mut h = harness_with(MemoryDirectory::default(), config);

    h.session.submit("hello", &SelectionContext::default());
    while let Some((_, tick)) = h.scheduler.pop() {
        h.session.on_fade_tick(tick);
    }
    assert_eq!(h.session.fade().state(), FadeState::Done);
    assert_eq!(h.session.fade().opacity(), 0.0);

    h.session.submit("anyone?", &SelectionContext::default());
    assert_eq!(h.session.fade().state(), FadeState::FullDisplay);
    assert_eq!(h.session.fade().opacity(), 1.0);
}

#[test]
fn test_buddies_override_reaches_online_buddies() {
    let yeesha = PlayerIdentity::new("Yeesha", 2);
    let directory = MemoryDirectory::default()
        .with_buddy(yeesha.clone(), true)
        .with_buddy(PlayerIdentity::new("Gehn", 5), false);
    let mut h = harness_with(directory, ChatConfig::default());

    let events = h.session.submit("/buddies meet at the library", &SelectionContext::default());

    let sent = h.transport.last().unwrap();
    assert_eq!(sent.recipients, vec![yeesha]);
    assert_eq!(sent.text, "<<Kirel>>meet at the library");
    assert!(sent.flags.is_inter_age());

    let echo = events[0].as_line().unwrap();
    assert_eq!(echo.category, Category::BuddiesBroadcast);
    assert_eq!(echo.prefix, Some(ContextPrefix::Buddies));
}
