//! Core partitioner trait definitions.

use crate::ring::RingPosition;

/// A partitioner converts keys into positions on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// position generation without synchronization overhead. Every
/// implementation must produce full-width 128-bit positions so that ring
/// order stays a plain byte comparison.
pub trait Partitioner: Clone + Send + Sync + 'static {
    /// Converts a key into a ring position.
    ///
    /// # Arguments
    ///
    /// * `key` - The key bytes to partition
    ///
    /// # Returns
    ///
    /// The key's position on the ring. The same bytes always yield the
    /// same position.
    fn position(&self, key: &[u8]) -> RingPosition;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
