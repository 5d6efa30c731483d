//! Player data model: playback status, the per-refresh snapshot and its
//! builder.

mod info;
mod snapshot;

pub use info::*;
pub use snapshot::build_snapshot;
