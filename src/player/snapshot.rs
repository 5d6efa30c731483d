use log::{debug, error, warn};

use crate::config::Settings;
use crate::mpris::{MediaControl, PlayerHandle};

use super::info::{PlayerInfo, escape_markup, format_hms};

/// Build the immutable snapshot of the bound player for one refresh cycle.
///
/// Returns `None` when the cycle's update should be suppressed: the resolved
/// identity is an ignored player, or any fetch other than position failed.
pub fn build_snapshot(
    handle: &dyn PlayerHandle,
    bound_identity: &str,
    control: &dyn MediaControl,
    settings: &Settings,
) -> Option<PlayerInfo> {
    // When following the aggregating proxy, the effective identity is
    // whichever concrete player was most recently active, re-resolved on
    // every refresh.
    let name = if settings.uses_proxy() {
        match control.active_player() {
            Ok(Some(name)) => name,
            Ok(None) => settings.player.clone(),
            Err(e) => {
                error!("mpris[{}]: unable to resolve active player: {e}", settings.player);
                return None;
            }
        }
    } else {
        bound_identity.to_string()
    };

    if settings.ignored_players.iter().any(|ignored| *ignored == name) {
        warn!("mpris[{name}]: ignoring player update");
        return None;
    }

    match fetch_info(handle, &name) {
        Ok(info) => Some(info),
        Err(e) => {
            error!("mpris[{name}]: {e}");
            None
        }
    }
}

/// Fetch every snapshot field, short-circuiting on the first fatal failure.
/// Position is the one fetch allowed to fail: players that do not report it
/// simply leave the field unset.
fn fetch_info(handle: &dyn PlayerHandle, name: &str) -> zbus::Result<PlayerInfo> {
    let status = handle.playback_status()?;

    let artist = handle.artist()?.map(|v| escape_markup(&v));
    if let Some(artist) = &artist {
        debug!("mpris[{name}]: artist = {artist}");
    }

    let album = handle.album()?.map(|v| escape_markup(&v));
    if let Some(album) = &album {
        debug!("mpris[{name}]: album = {album}");
    }

    let title = handle.title()?.map(|v| escape_markup(&v));
    if let Some(title) = &title {
        debug!("mpris[{name}]: title = {title}");
    }

    let length = handle.length_us()?.map(format_hms);
    if let Some(length) = &length {
        debug!("mpris[{name}]: length = {length}");
    }

    let position = handle.position_us().ok().map(format_hms);

    Ok(PlayerInfo {
        name: name.to_string(),
        status,
        artist,
        album,
        title,
        length,
        position,
    })
}
