//! Presentation boundary: visibility, rendered text and style tags.


use std::collections::BTreeSet;
use std::io::{self, Write};

use log::error;
use serde_json::json;

/// One rendered update for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Markup label text.
    pub label: String,
    /// Plain tooltip text.
    pub tooltip: String,
    /// Style tags of the previous cycle, dropped before `add_classes`.
    pub remove_classes: Vec<String>,
    /// Style tags for this cycle: the status label and the player identity.
    pub add_classes: Vec<String>,
}

/// Where rendered frames go.
pub trait Presenter {
    fn show(&mut self, frame: &Frame);
    fn hide(&mut self);
}

/// Emits Waybar `custom` module JSON objects on a writer, one per line.
pub struct WaybarOutput<W: Write> {
    out: W,
    classes: BTreeSet<String>,
    visible: bool,
}

impl WaybarOutput<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WaybarOutput<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            classes: BTreeSet::new(),
            visible: true,
        }
    }

    fn emit(&mut self, text: &str, tooltip: &str) {
        let payload = json!({
            "text": text,
            "tooltip": tooltip,
            "class": self.classes.iter().collect::<Vec<_>>(),
        });
        if let Err(e) = writeln!(self.out, "{payload}").and_then(|()| self.out.flush()) {
            error!("mpris: failed to write bar update: {e}");
        }
    }
}

impl<W: Write> Presenter for WaybarOutput<W> {
    fn show(&mut self, frame: &Frame) {
        for class in &frame.remove_classes {
            self.classes.remove(class);
        }
        for class in &frame.add_classes {
            self.classes.insert(class.clone());
        }
        self.visible = true;
        let Frame { label, tooltip, .. } = frame;
        self.emit(label, tooltip);
    }

    fn hide(&mut self) {
        // Collapse the module; repeated hides stay quiet.
        if self.visible {
            self.visible = false;
            self.emit("", "");
        }
    }
}
