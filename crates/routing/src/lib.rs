//! Routing of requests and queued messages onto cells.
//!
//! This crate sits between transports and the hash ring:
//! - Extracting routing keys from request paths and notification bodies
//! - Resolving the ring's chosen cell to a concrete target
//! - Building the cell-tagged message the enricher republishes
//!
//! Nothing here performs I/O on requests or messages.

pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod extract;

pub use config::RouterConfig;
pub use directory::CellDirectory;
pub use dispatcher::{Dispatcher, Forward, ForwardAttribute, Route};
pub use error::{Result, RoutingError};
pub use extract::{EnvelopeExtractor, EnvelopeFields, KeyExtractor, PathPattern};
