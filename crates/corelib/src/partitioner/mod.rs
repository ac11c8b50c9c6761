//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys and virtual node labels
//! into positions that can be placed on the hash ring.

pub mod md5;
pub mod traits;
pub mod xxh3;

pub use self::md5::Md5Partitioner;
pub use self::traits::Partitioner;
pub use self::xxh3::Xxh3Partitioner;
