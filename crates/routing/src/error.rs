//! Error types for the routing layer.

use corelib::NodeName;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the routing crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors raised while turning a request or message into a destination.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// The ring rejected the key or a membership change.
    #[error("Ring error: {0}")]
    Ring(#[from] corelib::Error),

    /// The request or message carries no usable routing key.
    #[error("No routing key in {0:?}")]
    MissingRoutingKey(String),

    /// A message body is not the expected JSON envelope.
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The ring chose a cell that the directory has no target for.
    #[error("No target registered for cell {0}")]
    UnknownCell(NodeName),

    /// A route pattern must contain exactly one `:param` segment.
    #[error("Invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("Failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
