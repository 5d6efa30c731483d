use std::collections::HashMap;

use serde::Deserialize;

/// Template applied when no per-status override matches.
pub const DEFAULT_FORMAT: &str = "{player} ({status}): {dynamic}";

/// Target identity selecting the `playerctld` aggregating proxy, which
/// follows whichever player was most recently active.
pub const DEFAULT_PLAYER: &str = "playerctld";

/// Top-level module settings loaded from `config.toml`.
///
/// File format: TOML, kebab-case keys
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/playbar/config.toml` or
/// `~/.config/playbar/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PLAYBAR__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Label template; per-status variants win when non-empty.
    pub format: String,
    pub format_playing: String,
    pub format_paused: String,
    pub format_stopped: String,

    /// Tooltip template; per-status variants win when non-empty.
    pub tooltip_format: String,
    pub tooltip_format_playing: String,
    pub tooltip_format_paused: String,
    pub tooltip_format_stopped: String,

    /// Marker appended to truncated fields.
    pub ellipsis: String,

    /// Column limits for the metadata fields. Negative means unlimited.
    pub artist_len: i64,
    pub album_len: i64,
    pub title_len: i64,
    /// Column budget shared by the `{dynamic}` tokens. Negative means
    /// unlimited.
    pub dynamic_len: i64,

    /// Order in which `{dynamic}` tokens compete for the shared budget.
    /// Recognized tokens: artist, album, title, length, position.
    pub dynamic_priority: Vec<String>,

    /// Drop a leading `00:` hour segment from length/position.
    pub truncate_hours: bool,

    /// Apply the column limits to the tooltip as well.
    pub enable_tooltip_len_limits: bool,

    /// Periodic refresh interval in seconds; 0 disables it.
    pub interval: u64,

    /// Player identity to follow, or [`DEFAULT_PLAYER`] for the proxy.
    pub player: String,

    /// Player identities whose updates are suppressed.
    pub ignored_players: Vec<String>,

    /// Icon tables for `{player_icon}` / `{status_icon}`; the `"default"`
    /// key is the fallback.
    pub player_icons: HashMap<String, String>,
    pub status_icons: HashMap<String, String>,

    /// Click command overrides. When set, the override fully replaces the
    /// built-in transport action for that button.
    pub on_click: Option<String>,
    pub on_middle_click: Option<String>,
    pub on_right_click: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            format_playing: String::new(),
            format_paused: String::new(),
            format_stopped: String::new(),

            tooltip_format: DEFAULT_FORMAT.to_string(),
            tooltip_format_playing: String::new(),
            tooltip_format_paused: String::new(),
            tooltip_format_stopped: String::new(),

            ellipsis: "\u{2026}".to_string(),

            artist_len: -1,
            album_len: -1,
            title_len: -1,
            dynamic_len: -1,

            dynamic_priority: vec![
                "title".to_string(),
                "length".to_string(),
                "position".to_string(),
                "artist".to_string(),
                "album".to_string(),
            ],

            truncate_hours: true,
            enable_tooltip_len_limits: false,

            interval: 0,
            player: DEFAULT_PLAYER.to_string(),
            ignored_players: Vec::new(),

            player_icons: HashMap::new(),
            status_icons: HashMap::new(),

            on_click: None,
            on_middle_click: None,
            on_right_click: None,
        }
    }
}

fn limit(len: i64) -> Option<usize> {
    usize::try_from(len).ok()
}

impl Settings {
    pub fn artist_limit(&self) -> Option<usize> {
        limit(self.artist_len)
    }

    pub fn album_limit(&self) -> Option<usize> {
        limit(self.album_len)
    }

    pub fn title_limit(&self) -> Option<usize> {
        limit(self.title_len)
    }

    pub fn dynamic_limit(&self) -> Option<usize> {
        limit(self.dynamic_len)
    }

    /// Whether the configured target is the aggregating proxy rather than a
    /// concrete player name.
    pub fn uses_proxy(&self) -> bool {
        self.player == DEFAULT_PLAYER
    }
}
