//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive the module's
//! formatting and player selection, and helpers to load it from disk.

mod load;
mod schema;

pub use schema::*;
