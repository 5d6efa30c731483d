//! Process wiring: settings, transport, module construction and the event
//! loop.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::module::Module;
use crate::mpris::{MprisControl, PlayerEvent};
use crate::present::WaybarOutput;

mod event_loop;
mod settings;
mod timer;

use event_loop::Input;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let (input_tx, input_rx) = mpsc::channel::<Input>();

    // Transport events are bridged into the same queue as ticks and clicks,
    // so the module has a single sequential consumer.
    let (player_tx, player_rx) = mpsc::channel::<PlayerEvent>();
    {
        let input_tx = input_tx.clone();
        thread::spawn(move || {
            for event in player_rx {
                if input_tx.send(Input::Player(event)).is_err() {
                    return;
                }
            }
        });
    }

    let control = MprisControl::connect(player_tx)?;
    let presenter = WaybarOutput::stdout();
    let mut module = Module::new(settings.clone(), Box::new(control), Box::new(presenter))?;

    let _timer = (settings.interval > 0)
        .then(|| timer::Sleeper::spawn(Duration::from_secs(settings.interval), input_tx.clone()));

    event_loop::spawn_click_reader(input_tx);

    // Initial update before any event arrives.
    module.refresh();

    event_loop::run(&mut module, &input_rx);
    Ok(())
}
