//! Schema module - Configuration and snapshot types for grid automata.

mod config;
mod snapshot;

pub use config::*;
pub use snapshot::*;
