//! Media-control collaborator interface and its D-Bus implementation.
//!
//! The core only ever sees the [`MediaControl`] / [`PlayerHandle`] traits and
//! the typed [`PlayerEvent`] feed; [`MprisControl`] implements them over the
//! session bus. Keeping the seam here lets every core test run against
//! in-process fakes.

mod client;

pub use client::MprisControl;


use crate::config::DEFAULT_PLAYER;
use crate::player::PlaybackStatus;

/// Bus-name prefix shared by MPRIS players on the session bus.
pub const MPRIS_BUS_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Lifecycle and playback events pushed by the transport.
///
/// Playback and metadata events carry the identity they originated from so
/// that a listener outliving its binding cannot confuse the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A player claimed its well-known bus name.
    Appeared(String),
    /// A player released its well-known bus name.
    Vanished(String),
    Play { source: String },
    Pause { source: String },
    Stop { source: String },
    /// Track metadata changed.
    Metadata { source: String },
}

/// A bound connection to one player (or to the aggregating proxy).
pub trait PlayerHandle {
    fn playback_status(&self) -> zbus::Result<PlaybackStatus>;
    fn artist(&self) -> zbus::Result<Option<String>>;
    fn album(&self) -> zbus::Result<Option<String>>;
    fn title(&self) -> zbus::Result<Option<String>>;
    /// Track length in microseconds; `None` when the player reports none.
    fn length_us(&self) -> zbus::Result<Option<u64>>;
    /// Playback position in microseconds. Many players do not implement
    /// this; callers treat an error as "not reported".
    fn position_us(&self) -> zbus::Result<u64>;
    fn play_pause(&self) -> zbus::Result<()>;
    fn next(&self) -> zbus::Result<()>;
    fn previous(&self) -> zbus::Result<()>;
}

/// The media-control service as seen by the lifecycle state machine.
pub trait MediaControl {
    /// Identities of the players currently on the bus.
    fn player_names(&self) -> zbus::Result<Vec<String>>;

    /// Most recently active identity, as tracked by the `playerctld` proxy.
    fn active_player(&self) -> zbus::Result<Option<String>>;

    /// Bind `identity` and subscribe to its playback/metadata events.
    fn bind(&self, identity: &str) -> zbus::Result<Box<dyn PlayerHandle>>;

    /// Bind the aggregating proxy itself.
    fn bind_proxy(&self) -> zbus::Result<Box<dyn PlayerHandle>> {
        self.bind(DEFAULT_PLAYER)
    }
}
