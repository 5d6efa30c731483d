use std::io::BufRead;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use log::debug;

use crate::module::{ClickButton, Module};
use crate::mpris::PlayerEvent;

/// Everything the consumer thread reacts to, in one queue.
pub(super) enum Input {
    Player(PlayerEvent),
    Tick,
    Click(ClickButton),
}

/// Main consumer loop: apply queued inputs and coalesce refresh requests so
/// that a burst of events produces a single render pass.
pub(super) fn run(module: &mut Module, inputs: &Receiver<Input>) {
    while let Ok(first) = inputs.recv() {
        let mut refresh = apply(module, first);
        while let Ok(next) = inputs.try_recv() {
            refresh |= apply(module, next);
        }
        if refresh {
            module.refresh();
        }
    }
}

fn apply(module: &mut Module, input: Input) -> bool {
    match input {
        Input::Player(event) => module.handle_event(event),
        Input::Tick => true,
        Input::Click(button) => {
            module.handle_click(button);
            false
        }
    }
}

/// Feed click events from stdin lines (`primary` / `middle` / `secondary`).
pub(super) fn spawn_click_reader(inputs: Sender<Input>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { return };
            match ClickButton::parse(&line) {
                Some(button) => {
                    if inputs.send(Input::Click(button)).is_err() {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => debug!("mpris: ignoring unknown click {line:?}"),
            }
        }
    });
}
