use super::*;
use crate::present::Frame;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
struct FakePlayer {
    status: &'static str,
    artist: Option<&'static str>,
    album: Option<&'static str>,
    title: Option<&'static str>,
    commands: Rc<RefCell<Vec<&'static str>>>,
}

impl FakePlayer {
    fn playing() -> Self {
        Self {
            status: "Playing",
            artist: Some("Radiohead"),
            album: Some("OK Computer"),
            title: Some("Karma Police"),
            commands: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn stopped() -> Self {
        Self {
            status: "Stopped",
            ..Self::playing()
        }
    }
}

impl PlayerHandle for FakePlayer {
    fn playback_status(&self) -> zbus::Result<PlaybackStatus> {
        Ok(PlaybackStatus::parse(self.status))
    }

    fn artist(&self) -> zbus::Result<Option<String>> {
        Ok(self.artist.map(str::to_string))
    }

    fn album(&self) -> zbus::Result<Option<String>> {
        Ok(self.album.map(str::to_string))
    }

    fn title(&self) -> zbus::Result<Option<String>> {
        Ok(self.title.map(str::to_string))
    }

    fn length_us(&self) -> zbus::Result<Option<u64>> {
        Ok(None)
    }

    fn position_us(&self) -> zbus::Result<u64> {
        Err(zbus::Error::Failure("no position".to_string()))
    }

    fn play_pause(&self) -> zbus::Result<()> {
        self.commands.borrow_mut().push("play_pause");
        Ok(())
    }

    fn next(&self) -> zbus::Result<()> {
        self.commands.borrow_mut().push("next");
        Ok(())
    }

    fn previous(&self) -> zbus::Result<()> {
        self.commands.borrow_mut().push("previous");
        Ok(())
    }
}

struct FakeControl {
    players: Vec<String>,
    active: Option<String>,
    handle: FakePlayer,
    binds: Rc<RefCell<Vec<String>>>,
}

impl MediaControl for FakeControl {
    fn player_names(&self) -> zbus::Result<Vec<String>> {
        Ok(self.players.clone())
    }

    fn active_player(&self) -> zbus::Result<Option<String>> {
        Ok(self.active.clone())
    }

    fn bind(&self, identity: &str) -> zbus::Result<Box<dyn PlayerHandle>> {
        self.binds.borrow_mut().push(identity.to_string());
        Ok(Box::new(self.handle.clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Show(Frame),
    Hide,
}

struct FakePresenter {
    ops: Rc<RefCell<Vec<Op>>>,
}

impl Presenter for FakePresenter {
    fn show(&mut self, frame: &Frame) {
        self.ops.borrow_mut().push(Op::Show(frame.clone()));
    }

    fn hide(&mut self) {
        self.ops.borrow_mut().push(Op::Hide);
    }
}

struct Harness {
    module: Module,
    ops: Rc<RefCell<Vec<Op>>>,
    binds: Rc<RefCell<Vec<String>>>,
    commands: Rc<RefCell<Vec<&'static str>>>,
}

fn harness(settings: Settings, players: &[&str], handle: FakePlayer) -> Harness {
    let ops = Rc::new(RefCell::new(Vec::new()));
    let binds = Rc::new(RefCell::new(Vec::new()));
    let commands = handle.commands.clone();

    let control = FakeControl {
        players: players.iter().map(|s| s.to_string()).collect(),
        active: None,
        handle,
        binds: binds.clone(),
    };
    let presenter = FakePresenter { ops: ops.clone() };
    let module = Module::new(settings, Box::new(control), Box::new(presenter)).unwrap();

    Harness {
        module,
        ops,
        binds,
        commands,
    }
}

fn concrete(player: &str) -> Settings {
    Settings {
        player: player.to_string(),
        ..Settings::default()
    }
}

#[test]
fn construction_binds_the_proxy_target_immediately() {
    let h = harness(Settings::default(), &[], FakePlayer::playing());
    assert_eq!(*h.binds.borrow(), vec!["playerctld"]);
    assert_eq!(h.module.bound_identity(), Some("playerctld"));
}

#[test]
fn construction_binds_a_listed_concrete_target() {
    let h = harness(concrete("spotify"), &["mpv", "spotify"], FakePlayer::playing());
    assert_eq!(*h.binds.borrow(), vec!["spotify"]);
}

#[test]
fn construction_stays_unbound_for_a_missing_target() {
    let h = harness(concrete("spotify"), &["mpv"], FakePlayer::playing());
    assert!(h.binds.borrow().is_empty());
    assert_eq!(h.module.bound_identity(), None);
}

#[test]
fn appeared_target_binds_and_requests_refresh() {
    let mut h = harness(concrete("spotify"), &[], FakePlayer::playing());
    assert!(h.module.handle_event(PlayerEvent::Appeared("spotify".to_string())));
    assert_eq!(*h.binds.borrow(), vec!["spotify"]);
    assert_eq!(h.module.bound_identity(), Some("spotify"));
}

#[test]
fn appeared_other_player_is_ignored() {
    let mut h = harness(concrete("spotify"), &[], FakePlayer::playing());
    assert!(!h.module.handle_event(PlayerEvent::Appeared("mpv".to_string())));
    assert!(h.binds.borrow().is_empty());
}

#[test]
fn vanished_bound_player_unbinds_and_requests_refresh() {
    let mut h = harness(concrete("spotify"), &["spotify"], FakePlayer::playing());
    assert!(h.module.handle_event(PlayerEvent::Vanished("spotify".to_string())));
    assert_eq!(h.module.bound_identity(), None);
}

#[test]
fn vanished_other_player_is_ignored() {
    let mut h = harness(concrete("spotify"), &["spotify"], FakePlayer::playing());
    assert!(!h.module.handle_event(PlayerEvent::Vanished("mpv".to_string())));
    assert_eq!(h.module.bound_identity(), Some("spotify"));
}

#[test]
fn playback_events_from_the_bound_source_request_refresh() {
    let mut h = harness(concrete("spotify"), &["spotify"], FakePlayer::playing());
    for event in [
        PlayerEvent::Play {
            source: "spotify".to_string(),
        },
        PlayerEvent::Pause {
            source: "spotify".to_string(),
        },
        PlayerEvent::Metadata {
            source: "spotify".to_string(),
        },
    ] {
        assert!(h.module.handle_event(event));
    }
    assert!(h.ops.borrow().is_empty());
}

#[test]
fn stale_source_events_are_dropped() {
    let mut h = harness(concrete("spotify"), &["spotify"], FakePlayer::playing());
    assert!(!h.module.handle_event(PlayerEvent::Play {
        source: "firefox".to_string(),
    }));
    assert!(!h.module.handle_event(PlayerEvent::Stop {
        source: "firefox".to_string(),
    }));
    assert!(h.ops.borrow().is_empty());
}

#[test]
fn stop_event_hides_and_requests_refresh() {
    let mut h = harness(concrete("spotify"), &["spotify"], FakePlayer::stopped());
    assert!(h.module.handle_event(PlayerEvent::Stop {
        source: "spotify".to_string(),
    }));
    // The follow-up refresh sees a stopped snapshot and skips the update,
    // so the module stays hidden with no further render.
    h.module.refresh();
    assert_eq!(*h.ops.borrow(), vec![Op::Hide]);
}

#[test]
fn refresh_renders_a_playing_snapshot() {
    let mut h = harness(Settings::default(), &[], FakePlayer::playing());
    h.module.refresh();

    let ops = h.ops.borrow();
    let [Op::Show(frame)] = ops.as_slice() else {
        panic!("expected one show, got {ops:?}");
    };
    assert_eq!(
        frame.label,
        "playerctld (playing): Radiohead - OK Computer - Karma Police"
    );
    assert_eq!(frame.add_classes, vec!["playing", "playerctld"]);
}

#[test]
fn refresh_while_unbound_hides() {
    let mut h = harness(concrete("spotify"), &[], FakePlayer::playing());
    h.module.refresh();
    assert_eq!(*h.ops.borrow(), vec![Op::Hide]);
}

#[test]
fn refresh_for_an_ignored_player_hides() {
    let settings = Settings {
        ignored_players: vec!["spotify".to_string()],
        ..concrete("spotify")
    };
    let mut h = harness(settings, &["spotify"], FakePlayer::playing());
    h.module.refresh();
    h.module.refresh();
    assert_eq!(*h.ops.borrow(), vec![Op::Hide, Op::Hide]);
}

#[test]
fn clicks_invoke_the_builtin_transport_actions() {
    let mut h = harness(concrete("spotify"), &["spotify"], FakePlayer::playing());
    h.module.handle_click(ClickButton::Primary);
    h.module.handle_click(ClickButton::Middle);
    h.module.handle_click(ClickButton::Secondary);
    assert_eq!(*h.commands.borrow(), vec!["play_pause", "previous", "next"]);
}

#[test]
fn click_override_replaces_the_builtin_action() {
    let settings = Settings {
        on_click: Some(":".to_string()),
        ..concrete("spotify")
    };
    let mut h = harness(settings, &["spotify"], FakePlayer::playing());
    h.module.handle_click(ClickButton::Primary);
    assert!(h.commands.borrow().is_empty());
}

#[test]
fn clicks_while_unbound_are_ignored() {
    let mut h = harness(concrete("spotify"), &[], FakePlayer::playing());
    h.module.handle_click(ClickButton::Primary);
    assert!(h.commands.borrow().is_empty());
}

#[test]
fn click_button_parsing() {
    assert_eq!(ClickButton::parse("primary"), Some(ClickButton::Primary));
    assert_eq!(ClickButton::parse(" Middle \n"), Some(ClickButton::Middle));
    assert_eq!(ClickButton::parse("SECONDARY"), Some(ClickButton::Secondary));
    assert_eq!(ClickButton::parse("double"), None);
}
