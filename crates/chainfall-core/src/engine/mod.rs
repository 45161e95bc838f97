//! Grid physics: placement, flood fill and cascading chain resolution.

pub mod chain;
pub mod flood;
pub mod placement;

pub use chain::{ChainReport, ChainStep, ClearedGroup, resolve_chains};
pub use flood::{CLEAR_THRESHOLD, Component, Visited, flood_fill};
pub use placement::{Landing, PlacementError, place_pair};
