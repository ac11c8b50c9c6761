//! Consistent hash ring implementation.
//!
//! The ring manages virtual node positions and provides efficient lookup
//! operations for finding the node responsible for a key.

pub mod position;
pub mod ring;
pub mod shared;
pub mod topology;

pub use position::RingPosition;
pub use ring::{HashRing, RingBuilder, RingConfig, DEFAULT_VIRTUAL_NODES};
pub use shared::SharedRing;
pub use topology::{Ownership, RingTopology};

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
