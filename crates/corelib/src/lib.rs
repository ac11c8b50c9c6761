//! Core library for consistent hashing of routing keys onto cells.
//!
//! This crate provides the fundamental abstractions for consistent hashing:
//! - Validated node names and routing keys
//! - Partitioner algorithms producing fixed-width ring positions
//! - Virtual node derivation
//! - The hash ring, a lock-guarded shared handle, and a topology view

pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod vnode;

pub use error::{Error, Result};
pub use node::{NodeName, RoutingKey};
pub use partitioner::{Md5Partitioner, Partitioner, Xxh3Partitioner};
pub use ring::{HashRing, Ring, RingBuilder, RingConfig, RingPosition, RingTopology, SharedRing};
pub use vnode::VirtualNode;
