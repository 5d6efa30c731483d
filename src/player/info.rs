/// The playback state reported by a player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::Stopped
    }
}

impl PlaybackStatus {
    /// Parse the MPRIS `PlaybackStatus` property value. Unknown strings are
    /// treated as stopped.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            _ => Self::Stopped,
        }
    }

    /// Lowercase label used for the `{status}` token and style tags.
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

/// Immutable view of the bound player for one refresh cycle.
///
/// Text fields are already markup-escaped; `length`/`position` are formatted
/// `HH:MM:SS`. Position is absent for players that do not report it, which
/// is expected and not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerInfo {
    pub name: String,
    pub status: PlaybackStatus,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub length: Option<String>,
    pub position: Option<String>,
}

/// Format a microsecond duration as zero-padded `HH:MM:SS`.
pub fn format_hms(micros: u64) -> String {
    let total = micros / 1_000_000;
    format!("{:02}:{:02}:{:02}", total / 3600, total % 3600 / 60, total % 60)
}

/// Escape text for embedding in Pango markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
