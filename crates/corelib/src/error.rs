//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Every variant is a caller precondition violation. The ring performs no
/// I/O, so there is no environmental failure mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Empty or malformed node name or lookup key.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The node is already a member of the ring.
    #[error("Node already exists: {0}")]
    AlreadyExists(String),
    /// The node is not a member of the ring.
    #[error("Node does not exist: {0}")]
    NotFound(String),
}
