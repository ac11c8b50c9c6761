//! MD5 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::ring::RingPosition;
use ::md5::{Digest, Md5};

/// MD5 partitioner, the ring default.
///
/// MD5 is used because its 128-bit digest gives an even spread and is
/// compatible with gateways that render positions as `digest('hex')`
/// strings. Nothing here depends on its cryptographic strength.
#[derive(Clone, Copy, Debug, Default)]
pub struct Md5Partitioner;

impl Partitioner for Md5Partitioner {
    fn position(&self, key: &[u8]) -> RingPosition {
        let mut bytes = [0u8; RingPosition::WIDTH];
        bytes.copy_from_slice(&Md5::digest(key));
        RingPosition::from_bytes(bytes)
    }

    fn name(&self) -> &'static str {
        "Md5Partitioner"
    }
}
