//! Per-status template selection, token substitution and icon lookup.
//!
//! The renderer owns the previous cycle's output: template failures retain
//! the last good text for that target only, and style tags are diffed so the
//! presentation layer never accumulates stale classes.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use log::warn;

use crate::config::Settings;
use crate::dynamic;
use crate::player::{PlaybackStatus, PlayerInfo};
use crate::present::Frame;

/// Failure to expand a template.
#[derive(Debug, PartialEq, Eq)]
pub enum TemplateError {
    UnknownToken(String),
    UnclosedToken,
    StrayBrace,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken(name) => write!(f, "unknown token {{{name}}}"),
            Self::UnclosedToken => write!(f, "unclosed token reference"),
            Self::StrayBrace => write!(f, "unmatched '}}' in template"),
        }
    }
}

/// Expand `{token}` references from `tokens`; `{{` and `}}` are literal
/// braces.
pub fn substitute(template: &str, tokens: &HashMap<&str, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::StrayBrace),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(TemplateError::UnclosedToken),
                    }
                }
                match tokens.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => return Err(TemplateError::UnknownToken(name)),
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Resolve `key` in an icon table, falling back to `"default"`, then to the
/// empty string. Never errors.
pub fn icon(table: &HashMap<String, String>, key: &str) -> String {
    table
        .get(key)
        .or_else(|| table.get("default"))
        .cloned()
        .unwrap_or_default()
}

/// Stateful label/tooltip renderer.
pub struct Renderer {
    settings: Settings,
    last_label: String,
    last_tooltip: String,
    last_status: String,
    last_player: String,
}

impl Renderer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            last_label: String::new(),
            last_tooltip: String::new(),
            last_status: String::new(),
            last_player: String::new(),
        }
    }

    fn label_template(&self, status: PlaybackStatus) -> &str {
        let per_status = match status {
            PlaybackStatus::Playing => &self.settings.format_playing,
            PlaybackStatus::Paused => &self.settings.format_paused,
            PlaybackStatus::Stopped => &self.settings.format_stopped,
        };
        if per_status.is_empty() {
            &self.settings.format
        } else {
            per_status
        }
    }

    fn tooltip_template(&self, status: PlaybackStatus) -> &str {
        let per_status = match status {
            PlaybackStatus::Playing => &self.settings.tooltip_format_playing,
            PlaybackStatus::Paused => &self.settings.tooltip_format_paused,
            PlaybackStatus::Stopped => &self.settings.tooltip_format_stopped,
        };
        if per_status.is_empty() {
            &self.settings.tooltip_format
        } else {
            per_status
        }
    }

    /// Render one frame from `info`.
    pub fn render(&mut self, info: &PlayerInfo) -> Frame {
        let settings = &self.settings;
        let status_label = info.status.label().to_string();

        let player_icon = icon(&settings.player_icons, &info.name);
        let status_icon = icon(&settings.status_icons, &status_label);

        let label_tokens = HashMap::from([
            ("player", info.name.clone()),
            ("status", status_label.clone()),
            ("artist", dynamic::artist_str(info, settings, true)),
            ("title", dynamic::title_str(info, settings, true)),
            ("album", dynamic::album_str(info, settings, true)),
            ("length", dynamic::length_str(info, settings, true)),
            ("position", dynamic::position_str(info, settings, true)),
            ("dynamic", dynamic::compose(info, settings, true, true)),
            ("player_icon", player_icon.clone()),
            ("status_icon", status_icon.clone()),
        ]);

        let label = match substitute(self.label_template(info.status), &label_tokens) {
            Ok(label) => label,
            Err(e) => {
                warn!("mpris: format error: {e}");
                self.last_label.clone()
            }
        };

        // The tooltip ignores the column limits unless explicitly enabled,
        // and prefers the full time forms when the compact ones would not
        // actually be shorter.
        let limits = settings.enable_tooltip_len_limits;
        let tooltip_length = tooltip_time(
            dynamic::length_str(info, settings, true),
            dynamic::length_str(info, settings, false),
            limits,
        );
        let tooltip_position = tooltip_time(
            dynamic::position_str(info, settings, true),
            dynamic::position_str(info, settings, false),
            limits,
        );

        let tooltip_tokens = HashMap::from([
            ("player", info.name.clone()),
            ("status", status_label.clone()),
            ("artist", dynamic::artist_str(info, settings, limits)),
            ("title", dynamic::title_str(info, settings, limits)),
            ("album", dynamic::album_str(info, settings, limits)),
            ("length", tooltip_length),
            ("position", tooltip_position),
            ("dynamic", dynamic::compose(info, settings, limits, false)),
            ("player_icon", player_icon),
            ("status_icon", status_icon),
        ]);

        let tooltip = match substitute(self.tooltip_template(info.status), &tooltip_tokens) {
            Ok(tooltip) => tooltip,
            Err(e) => {
                warn!("mpris: format error (tooltip): {e}");
                self.last_tooltip.clone()
            }
        };

        // Previous cycle's style tags go first so the presenter never
        // accumulates stale ones.
        let mut remove_classes = Vec::new();
        if !self.last_status.is_empty() {
            remove_classes.push(self.last_status.clone());
        }
        if !self.last_player.is_empty() {
            remove_classes.push(self.last_player.clone());
        }
        let add_classes = vec![status_label.clone(), info.name.clone()];

        self.last_label = label.clone();
        self.last_tooltip = tooltip.clone();
        self.last_status = status_label;
        self.last_player = info.name.clone();

        Frame {
            label,
            tooltip,
            remove_classes,
            add_classes,
        }
    }
}

fn tooltip_time(truncated: String, full: String, limits: bool) -> String {
    if limits || truncated.chars().count() > 5 {
        truncated
    } else {
        full
    }
}
