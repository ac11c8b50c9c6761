//! Ring position implementation.

use crate::error::{Error, Result};
use std::fmt::{self, Debug};
use std::str::FromStr;

/// A position on the consistent hash ring.
///
/// Positions are 128-bit digests held as a fixed-size byte array. Byte-wise
/// comparison of equal-width big-endian arrays is the same order as the
/// unsigned numeric value, so the derived `Ord` is the ring order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingPosition([u8; 16]);

impl RingPosition {
    /// Width of a position in bytes.
    pub const WIDTH: usize = 16;

    /// First position on the ring.
    pub const MIN: RingPosition = RingPosition([0; 16]);

    /// Last position on the ring.
    pub const MAX: RingPosition = RingPosition([u8::MAX; 16]);

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Numeric value of the position.
    pub const fn as_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Clockwise distance from `self` to `other`.
    pub fn distance_to(&self, other: &Self) -> u128 {
        other.as_u128().wrapping_sub(self.as_u128())
    }
}

impl fmt::LowerHex for RingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for RingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl Debug for RingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RingPosition({:x})", self)
    }
}

impl FromStr for RingPosition {
    type Err = Error;

    /// Parses the 32-character hex rendering produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        if s.len() != Self::WIDTH * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidArgument(format!(
                "ring position must be {} hex characters: {:?}",
                Self::WIDTH * 2,
                s
            )));
        }
        u128::from_str_radix(s, 16)
            .map(Self::from_u128)
            .map_err(|e| Error::InvalidArgument(format!("ring position {:?}: {}", s, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rendering_is_fixed_width() {
        assert_eq!(
            RingPosition::from_u128(1).to_string(),
            "00000000000000000000000000000001"
        );
        assert_eq!(RingPosition::MAX.to_string(), "f".repeat(32));
    }

    #[test]
    fn test_order_matches_numeric_value() {
        let low = RingPosition::from_u128(0xff);
        let high = RingPosition::from_u128(0x100);
        assert!(low < high);
        assert!(RingPosition::MIN < low);
        assert!(high < RingPosition::MAX);
    }

    #[test]
    fn test_parse_round_trip_and_rejects_bad_width() {
        let pos: RingPosition = "0123456789abcdef0123456789abcdef".parse().unwrap();
        assert_eq!(pos.to_string(), "0123456789abcdef0123456789abcdef");
        assert!("abc".parse::<RingPosition>().is_err());
        assert!("+123456789abcdef0123456789abcdef".parse::<RingPosition>().is_err());
    }

    #[test]
    fn test_distance_wraps() {
        let a = RingPosition::from_u128(100);
        let b = RingPosition::from_u128(200);
        assert_eq!(a.distance_to(&b), 100);
        assert_eq!(RingPosition::MAX.distance_to(&RingPosition::MIN), 1);
    }
}
