use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::event_loop::Input;

/// Granularity of the cancellable sleep.
const SLICE: Duration = Duration::from_millis(250);

/// Periodic refresh timer.
///
/// Sleeps in short increments so dropping the timer never waits for a full
/// interval; the thread only ever enqueues ticks.
pub(super) struct Sleeper {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Sleeper {
    pub(super) fn spawn(interval: Duration, inputs: Sender<Input>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = thread::spawn(move || {
            loop {
                let mut slept = Duration::ZERO;
                while slept < interval {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    let slice = SLICE.min(interval - slept);
                    thread::sleep(slice);
                    slept += slice;
                }
                if inputs.send(Input::Tick).is_err() {
                    return;
                }
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for Sleeper {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
