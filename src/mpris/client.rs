use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

use log::debug;
use zbus::blocking::{Connection, fdo};
use zvariant::OwnedValue;

use super::{MPRIS_BUS_PREFIX, MediaControl, PlayerEvent, PlayerHandle};
use crate::player::PlaybackStatus;

#[zbus::proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait MprisPlayer {
    fn play_pause(&self) -> zbus::Result<()>;

    fn next(&self) -> zbus::Result<()>;

    fn previous(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// Players update `Position` without signalling, so it must never be
    /// served from the property cache.
    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> zbus::Result<i64>;
}

#[zbus::proxy(
    interface = "com.github.altdesktop.playerctld",
    default_service = "org.mpris.MediaPlayer2.playerctld",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait Playerctld {
    /// Bus names of known players, most recently active first.
    #[zbus(property)]
    fn player_names(&self) -> zbus::Result<Vec<String>>;
}

/// Session-bus implementation of the media-control capability set.
///
/// Lifecycle and playback signals are pumped from dedicated listener threads
/// into the channel handed to [`MprisControl::connect`]; the listeners only
/// enqueue, all state lives with the consumer.
pub struct MprisControl {
    conn: Connection,
    events: Sender<PlayerEvent>,
}

impl MprisControl {
    /// Connect to the session bus and start the name-owner watch.
    pub fn connect(events: Sender<PlayerEvent>) -> zbus::Result<Self> {
        let conn = Connection::session()?;
        spawn_name_watch(&conn, events.clone())?;
        Ok(Self { conn, events })
    }
}

impl MediaControl for MprisControl {
    fn player_names(&self) -> zbus::Result<Vec<String>> {
        let dbus = fdo::DBusProxy::new(&self.conn)?;
        let names = dbus.list_names()?;
        Ok(names
            .iter()
            .filter_map(|name| name.as_str().strip_prefix(MPRIS_BUS_PREFIX))
            .map(str::to_string)
            .collect())
    }

    fn active_player(&self) -> zbus::Result<Option<String>> {
        let playerctld = PlayerctldProxyBlocking::new(&self.conn)?;
        let names = playerctld.player_names()?;
        Ok(names
            .first()
            .map(|name| name.strip_prefix(MPRIS_BUS_PREFIX).unwrap_or(name).to_string()))
    }

    fn bind(&self, identity: &str) -> zbus::Result<Box<dyn PlayerHandle>> {
        let bus_name = format!("{MPRIS_BUS_PREFIX}{identity}");
        let proxy = MprisPlayerProxyBlocking::builder(&self.conn)
            .destination(bus_name.clone())?
            .build()?;

        let active = Arc::new(AtomicBool::new(true));
        spawn_property_watch(
            self.conn.clone(),
            identity.to_string(),
            bus_name,
            self.events.clone(),
            active.clone(),
        );

        Ok(Box::new(BoundPlayer { proxy, active }))
    }
}

struct BoundPlayer {
    proxy: MprisPlayerProxyBlocking<'static>,
    active: Arc<AtomicBool>,
}

impl Drop for BoundPlayer {
    fn drop(&mut self) {
        // Retire this binding's property watch.
        self.active.store(false, Ordering::Relaxed);
    }
}

impl PlayerHandle for BoundPlayer {
    fn playback_status(&self) -> zbus::Result<PlaybackStatus> {
        Ok(PlaybackStatus::parse(&self.proxy.playback_status()?))
    }

    fn artist(&self) -> zbus::Result<Option<String>> {
        Ok(self.proxy.metadata()?.get("xesam:artist").and_then(text_value))
    }

    fn album(&self) -> zbus::Result<Option<String>> {
        Ok(self.proxy.metadata()?.get("xesam:album").and_then(text_value))
    }

    fn title(&self) -> zbus::Result<Option<String>> {
        Ok(self.proxy.metadata()?.get("xesam:title").and_then(text_value))
    }

    fn length_us(&self) -> zbus::Result<Option<u64>> {
        Ok(self.proxy.metadata()?.get("mpris:length").and_then(micros_value))
    }

    fn position_us(&self) -> zbus::Result<u64> {
        let position = self.proxy.position()?;
        Ok(u64::try_from(position).unwrap_or(0))
    }

    fn play_pause(&self) -> zbus::Result<()> {
        self.proxy.play_pause()
    }

    fn next(&self) -> zbus::Result<()> {
        self.proxy.next()
    }

    fn previous(&self) -> zbus::Result<()> {
        self.proxy.previous()
    }
}

/// Decode a metadata text field: either a plain string or a list of strings
/// (multi-artist tracks), joined with `", "`. Empty values count as absent.
pub(super) fn text_value(value: &OwnedValue) -> Option<String> {
    if let Ok(s) = value.downcast_ref::<&str>() {
        return if s.is_empty() { None } else { Some(s.to_string()) };
    }
    if let Ok(items) = value.downcast_ref::<&zvariant::Array>() {
        let parts: Vec<&str> = items
            .iter()
            .filter_map(|item| item.downcast_ref::<&str>().ok())
            .filter(|s| !s.is_empty())
            .collect();
        if !parts.is_empty() {
            return Some(parts.join(", "));
        }
    }
    None
}

/// Decode `mpris:length`, which players encode with assorted integer types
/// (and the odd string).
pub(super) fn micros_value(value: &OwnedValue) -> Option<u64> {
    if let Ok(n) = value.downcast_ref::<u64>() {
        return Some(n);
    }
    if let Ok(n) = value.downcast_ref::<i64>() {
        return u64::try_from(n).ok();
    }
    if let Ok(n) = value.downcast_ref::<u32>() {
        return Some(n.into());
    }
    if let Ok(n) = value.downcast_ref::<i32>() {
        return u64::try_from(n).ok();
    }
    if let Ok(s) = value.downcast_ref::<&str>() {
        return s.parse().ok();
    }
    None
}

/// Map a `PlaybackStatus` property change to its lifecycle event.
pub(super) fn status_event(source: &str, raw: &str) -> PlayerEvent {
    let source = source.to_string();
    match PlaybackStatus::parse(raw) {
        PlaybackStatus::Playing => PlayerEvent::Play { source },
        PlaybackStatus::Paused => PlayerEvent::Pause { source },
        PlaybackStatus::Stopped => PlayerEvent::Stop { source },
    }
}

/// Watch `NameOwnerChanged` for MPRIS bus names and translate owner changes
/// into appeared/vanished events.
fn spawn_name_watch(conn: &Connection, events: Sender<PlayerEvent>) -> zbus::Result<()> {
    let dbus = fdo::DBusProxy::new(conn)?;
    let stream = dbus.receive_name_owner_changed()?;

    thread::spawn(move || {
        for signal in stream {
            let Ok(args) = signal.args() else { continue };
            let Some(identity) = args.name().as_str().strip_prefix(MPRIS_BUS_PREFIX) else {
                continue;
            };
            let identity = identity.to_string();
            debug!("mpris: name-owner change for {identity}");

            let event = if args.new_owner().is_some() {
                PlayerEvent::Appeared(identity)
            } else {
                PlayerEvent::Vanished(identity)
            };
            if events.send(event).is_err() {
                return;
            }
        }
    });

    Ok(())
}

/// Watch `PropertiesChanged` on one player and translate playback/metadata
/// changes into events tagged with `identity`.
fn spawn_property_watch(
    conn: Connection,
    identity: String,
    bus_name: String,
    events: Sender<PlayerEvent>,
    active: Arc<AtomicBool>,
) {
    thread::spawn(move || {
        if let Err(e) = watch_properties(&conn, &identity, &bus_name, &events, &active) {
            debug!("mpris[{identity}]: property watch ended: {e}");
        }
    });
}

fn watch_properties(
    conn: &Connection,
    identity: &str,
    bus_name: &str,
    events: &Sender<PlayerEvent>,
    active: &AtomicBool,
) -> zbus::Result<()> {
    let props = fdo::PropertiesProxy::builder(conn)
        .destination(bus_name.to_string())?
        .path("/org/mpris/MediaPlayer2")?
        .build()?;
    let changes = props.receive_properties_changed()?;

    for change in changes {
        if !active.load(Ordering::Relaxed) {
            return Ok(());
        }
        let Ok(args) = change.args() else { continue };
        if args.interface_name().as_str() != "org.mpris.MediaPlayer2.Player" {
            continue;
        }

        for (name, value) in args.changed_properties() {
            let event = match *name {
                "PlaybackStatus" => value
                    .downcast_ref::<&str>()
                    .ok()
                    .map(|raw| status_event(identity, raw)),
                "Metadata" => Some(PlayerEvent::Metadata {
                    source: identity.to_string(),
                }),
                _ => None,
            };
            if let Some(event) = event {
                if events.send(event).is_err() {
                    return Ok(());
                }
            }
        }
    }

    Ok(())
}
