//! Boundary types for the owlet engine
//!
//! Everything the host process exchanges with the core: the derived
//! budget view, warning tiers, catalog items, and the watch-completion
//! request. All timestamps at this boundary are absolute UTC instants
//! and serialize as RFC 3339 (textual, sortable).

mod types;

pub use types::*;
