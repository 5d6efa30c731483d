//! Field formatting and the `{dynamic}` summary composer.
//!
//! The composer combines artist/album/title/length/position into one bounded
//! string: fields are truncated to their own column limits first, then
//! compete for the shared `dynamic-len` budget in configured priority order.


use crate::config::Settings;
use crate::player::PlayerInfo;
use crate::width::{display_width, truncate_to_width};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Token {
    Artist,
    Album,
    Title,
    Length,
    Position,
}

fn parse_token(name: &str) -> Option<Token> {
    match name {
        "artist" => Some(Token::Artist),
        "album" => Some(Token::Album),
        "title" => Some(Token::Title),
        "length" => Some(Token::Length),
        "position" => Some(Token::Position),
        _ => None,
    }
}

fn metadata_field(
    value: Option<&str>,
    limit: Option<usize>,
    ellipsis: &str,
    truncated: bool,
) -> String {
    let value = value.unwrap_or_default();
    match limit {
        Some(max) if truncated => truncate_to_width(value, ellipsis, max),
        _ => value.to_string(),
    }
}

pub fn artist_str(info: &PlayerInfo, settings: &Settings, truncated: bool) -> String {
    metadata_field(
        info.artist.as_deref(),
        settings.artist_limit(),
        &settings.ellipsis,
        truncated,
    )
}

pub fn album_str(info: &PlayerInfo, settings: &Settings, truncated: bool) -> String {
    metadata_field(
        info.album.as_deref(),
        settings.album_limit(),
        &settings.ellipsis,
        truncated,
    )
}

pub fn title_str(info: &PlayerInfo, settings: &Settings, truncated: bool) -> String {
    metadata_field(
        info.title.as_deref(),
        settings.title_limit(),
        &settings.ellipsis,
        truncated,
    )
}

/// Drop the hour segment of a full `HH:MM:SS` rendering when it is zero; an
/// already short `MM:SS` stays as is.
fn strip_hours(hms: &str) -> &str {
    if hms.len() == 8 {
        hms.strip_prefix("00:").unwrap_or(hms)
    } else {
        hms
    }
}

pub fn length_str(info: &PlayerInfo, settings: &Settings, truncated: bool) -> String {
    let Some(length) = info.length.as_deref() else {
        return String::new();
    };
    if truncated && settings.truncate_hours {
        strip_hours(length).to_string()
    } else {
        length.to_string()
    }
}

pub fn position_str(info: &PlayerInfo, settings: &Settings, truncated: bool) -> String {
    let Some(position) = info.position.as_deref() else {
        return String::new();
    };
    // Position drops its hour segment only when length's rendering already
    // did, so both always show the same granularity.
    let length_stripped = matches!(
        info.length.as_deref(),
        Some(length) if strip_hours(length).len() < length.len()
    );
    if truncated && settings.truncate_hours && length_stripped {
        strip_hours(position).to_string()
    } else {
        position.to_string()
    }
}

/// Compose the `{dynamic}` summary.
///
/// `apply_limits` controls both the per-field truncation and the shared
/// budget walk; `for_label` wraps the time bracket in `<small>` markup.
///
/// The budget walk charges estimated costs (separator and bracket columns
/// included), so the final string may exceed the budget by a little; that
/// is an accepted heuristic of the cost model.
pub fn compose(info: &PlayerInfo, settings: &Settings, apply_limits: bool, for_label: bool) -> String {
    let artist = artist_str(info, settings, apply_limits);
    let album = album_str(info, settings, apply_limits);
    let title = title_str(info, settings, apply_limits);
    let length = length_str(info, settings, true);
    let position = position_str(info, settings, true);

    let mut show_artist = !artist.is_empty();
    let mut show_album = !album.is_empty();
    let mut show_title = !title.is_empty();
    let mut show_length = !length.is_empty();
    let mut show_position = !position.is_empty();

    if apply_limits {
        if let Some(budget) = settings.dynamic_limit() {
            // Estimated costs: trailing " - " for artist/album, one bracket
            // column each for length/position.
            let mut length_cost = if show_length { display_width(&length) + 1 } else { 0 };
            let mut position_cost = if show_position { display_width(&position) + 1 } else { 0 };
            let mut total = 0usize;

            let mut walk: Vec<Token> = Vec::with_capacity(5);
            for name in &settings.dynamic_priority {
                if let Some(token) = parse_token(name) {
                    if !walk.contains(&token) {
                        walk.push(token);
                    }
                }
            }

            for token in walk {
                match token {
                    Token::Artist if show_artist => {
                        let cost = display_width(&artist) + 3;
                        if total + cost > budget {
                            show_artist = false;
                        } else {
                            total += cost;
                        }
                    }
                    Token::Album if show_album => {
                        let cost = display_width(&album) + 3;
                        if total + cost > budget {
                            show_album = false;
                        } else {
                            total += cost;
                        }
                    }
                    Token::Title if show_title => {
                        let cost = display_width(&title);
                        if total + cost > budget {
                            show_title = false;
                        } else {
                            total += cost;
                        }
                    }
                    Token::Length if show_length => {
                        if total + length_cost > budget {
                            show_length = false;
                        } else {
                            total += length_cost;
                            // When both times fit they share one bracket pair.
                            position_cost = position_cost.saturating_sub(2);
                        }
                    }
                    Token::Position if show_position => {
                        if total + position_cost > budget {
                            show_position = false;
                        } else {
                            total += position_cost;
                            length_cost = length_cost.saturating_sub(2);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    let mut out = String::new();
    if show_artist {
        out.push_str(&artist);
        out.push_str(" - ");
    }
    if show_album {
        out.push_str(&album);
        out.push_str(" - ");
    }
    if show_title {
        out.push_str(&title);
    }
    if show_length || show_position {
        out.push(' ');
        if for_label {
            out.push_str("<small>");
        }
        out.push('[');
        if show_position {
            out.push_str(&position);
        }
        if show_position && show_length {
            out.push('/');
        }
        if show_length {
            out.push_str(&length);
        }
        out.push(']');
        if for_label {
            out.push_str("</small>");
        }
    }
    out
}
