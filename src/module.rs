//! The media module: owns the player binding, reacts to lifecycle events and
//! drives snapshot → render → present refresh cycles.

#[cfg(test)]
mod tests;

use std::process::Command;

use log::{debug, error, warn};

use crate::config::Settings;
use crate::mpris::{MediaControl, PlayerEvent, PlayerHandle};
use crate::player::{self, PlaybackStatus};
use crate::present::Presenter;
use crate::render::Renderer;

/// Mouse buttons of the click contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickButton {
    Primary,
    Middle,
    Secondary,
}

impl ClickButton {
    /// Parse a click feed line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "middle" => Some(Self::Middle),
            "secondary" => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Which player the module is following right now.
enum Binding {
    Unbound,
    Bound {
        identity: String,
        handle: Box<dyn PlayerHandle>,
    },
}

pub struct Module {
    settings: Settings,
    control: Box<dyn MediaControl>,
    renderer: Renderer,
    presenter: Box<dyn Presenter>,
    binding: Binding,
}

impl Module {
    /// Create the module and eagerly resolve the configured target.
    ///
    /// Transport failures here are fatal. A concrete target that is simply
    /// not running yet is not: the module stays unbound until the player
    /// appears on the bus.
    pub fn new(
        settings: Settings,
        control: Box<dyn MediaControl>,
        presenter: Box<dyn Presenter>,
    ) -> zbus::Result<Self> {
        let binding = if settings.uses_proxy() {
            Binding::Bound {
                identity: settings.player.clone(),
                handle: control.bind_proxy()?,
            }
        } else {
            let names = control.player_names()?;
            if names.iter().any(|name| *name == settings.player) {
                Binding::Bound {
                    identity: settings.player.clone(),
                    handle: control.bind(&settings.player)?,
                }
            } else {
                Binding::Unbound
            }
        };

        Ok(Self {
            renderer: Renderer::new(settings.clone()),
            settings,
            control,
            presenter,
            binding,
        })
    }

    fn bound_identity(&self) -> Option<&str> {
        match &self.binding {
            Binding::Bound { identity, .. } => Some(identity),
            Binding::Unbound => None,
        }
    }

    /// Apply one lifecycle event. Returns whether a refresh was requested;
    /// the caller coalesces requests into render passes.
    pub fn handle_event(&mut self, event: PlayerEvent) -> bool {
        match event {
            PlayerEvent::Appeared(identity) => {
                if identity != self.settings.player {
                    return false;
                }
                // Rebinding also covers a replaced bus-name owner.
                match self.control.bind(&identity) {
                    Ok(handle) => {
                        debug!("mpris: bound to {identity}");
                        self.binding = Binding::Bound { identity, handle };
                        true
                    }
                    Err(e) => {
                        error!("mpris[{identity}]: unable to bind player: {e}");
                        false
                    }
                }
            }
            PlayerEvent::Vanished(identity) => {
                if self.bound_identity() == Some(identity.as_str()) {
                    debug!("mpris: player {identity} vanished");
                    self.binding = Binding::Unbound;
                    true
                } else {
                    false
                }
            }
            PlayerEvent::Play { source }
            | PlayerEvent::Pause { source }
            | PlayerEvent::Metadata { source } => {
                // Events from a listener that outlived its binding are stale.
                self.bound_identity() == Some(source.as_str())
            }
            PlayerEvent::Stop { source } => {
                if self.bound_identity() == Some(source.as_str()) {
                    self.presenter.hide();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Run one refresh cycle: snapshot, render, present.
    pub fn refresh(&mut self) {
        let info = match &self.binding {
            Binding::Unbound => None,
            Binding::Bound { identity, handle } => player::build_snapshot(
                handle.as_ref(),
                identity,
                self.control.as_ref(),
                &self.settings,
            ),
        };

        let Some(info) = info else {
            self.presenter.hide();
            return;
        };

        if info.status == PlaybackStatus::Stopped {
            debug!("mpris[{}]: player stopped, skipping update", info.name);
            return;
        }

        debug!("mpris[{}]: running update", info.name);
        let frame = self.renderer.render(&info);
        self.presenter.show(&frame);
    }

    /// Dispatch a click: a configured command override fully replaces the
    /// built-in transport action for that button.
    pub fn handle_click(&mut self, button: ClickButton) {
        if let Some(command) = self.override_for(button) {
            run_override(command);
            return;
        }

        let Binding::Bound { identity, handle } = &self.binding else {
            debug!("mpris: click ignored, no player bound");
            return;
        };
        let result = match button {
            ClickButton::Primary => handle.play_pause(),
            ClickButton::Middle => handle.previous(),
            ClickButton::Secondary => handle.next(),
        };
        if let Err(e) = result {
            error!("mpris[{identity}]: error running builtin on-click action: {e}");
        }
    }

    fn override_for(&self, button: ClickButton) -> Option<&str> {
        match button {
            ClickButton::Primary => self.settings.on_click.as_deref(),
            ClickButton::Middle => self.settings.on_middle_click.as_deref(),
            ClickButton::Secondary => self.settings.on_right_click.as_deref(),
        }
    }
}

fn run_override(command: &str) {
    if let Err(e) = Command::new("sh").arg("-c").arg(command).spawn() {
        warn!("mpris: failed to run click command {command:?}: {e}");
    }
}
