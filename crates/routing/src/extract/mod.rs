//! Routing key extraction.
//!
//! Extractors pull the routing key out of whatever the router receives.
//! Each kind of input gets its own extractor:
//!
//! - **PathPattern**: the `:param` segment of an HTTP request path
//! - **EnvelopeExtractor**: a string attribute of a queued notification

pub mod envelope;
pub mod path;

pub use envelope::{EnvelopeExtractor, EnvelopeFields};
pub use path::PathPattern;

use crate::error::Result;
use corelib::RoutingKey;

/// Trait for routing key extractors.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as a single extractor
/// is shared by every request a router handles.
pub trait KeyExtractor: Send + Sync + 'static {
    /// What the key is extracted from.
    type Input: ?Sized;

    /// Extract the routing key from `input`.
    ///
    /// # Errors
    /// `MissingRoutingKey` when the input has no usable key, or a parse
    /// error for input that is not in the expected shape.
    fn extract_key(&self, input: &Self::Input) -> Result<RoutingKey>;

    /// Get the extractor name (for logging/debugging).
    fn name(&self) -> &'static str;
}
