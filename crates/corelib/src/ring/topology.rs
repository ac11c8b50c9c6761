//! Ring topology: who owns how much of the keyspace.
//!
//! A position owns the arc that ends at it, `(previous, position]`. The
//! first position's arc wraps around from the last position. Shares are
//! fractions of the full 128-bit keyspace.

use crate::node::NodeName;
use crate::partitioner::Partitioner;
use crate::ring::{HashRing, RingPosition};
use std::collections::BTreeMap;

/// Keyspace held by one real node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ownership {
    /// Number of ring positions (arcs) owned.
    pub arcs: usize,
    /// Fraction of the keyspace in `[0, 1]`.
    pub share: f64,
}

/// Point-in-time view over a ring's ownership.
#[derive(Debug, Clone, Default)]
pub struct RingTopology {
    ownership: BTreeMap<NodeName, Ownership>,
}

const KEYSPACE: f64 = u128::MAX as f64;

impl RingTopology {
    pub fn from_ring<P: Partitioner>(ring: &HashRing<P>) -> Self {
        let mut ownership: BTreeMap<NodeName, Ownership> = ring
            .nodes()
            .map(|node| (node.clone(), Ownership { arcs: 0, share: 0.0 }))
            .collect();

        let Some((last, _)) = ring.positions().last() else {
            return Self { ownership };
        };

        let mut previous: RingPosition = last;
        for (position, node) in ring.positions() {
            let arc = previous.distance_to(&position);
            // Distance 0 only happens for a single-position ring: that arc is the whole ring.
            let share = if arc == 0 { 1.0 } else { arc as f64 / KEYSPACE };
            if let Some(entry) = ownership.get_mut(node) {
                entry.arcs += 1;
                entry.share += share;
            }
            previous = position;
        }

        Self { ownership }
    }

    pub fn get(&self, node: &str) -> Option<Ownership> {
        self.ownership.get(node).copied()
    }

    /// Per-node ownership, sorted by node name.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeName, &Ownership)> + '_ {
        self.ownership.iter()
    }

    pub fn len(&self) -> usize {
        self.ownership.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ownership.is_empty()
    }

    /// Ratio of the largest share to the smallest. `1.0` is a perfect split.
    ///
    /// Returns `None` for an empty ring or when some node owns nothing.
    pub fn spread(&self) -> Option<f64> {
        let shares = self.ownership.values().map(|o| o.share);
        let max = shares.clone().fold(f64::NAN, f64::max);
        let min = shares.fold(f64::NAN, f64::min);
        if min.is_nan() || min <= 0.0 {
            return None;
        }
        Some(max / min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingConfig;
    use std::num::NonZeroUsize;

    fn ring(vnodes: usize, nodes: &[&str]) -> HashRing {
        let mut ring =
            HashRing::with_config(RingConfig::with_virtual_nodes(NonZeroUsize::new(vnodes).unwrap()));
        for node in nodes {
            ring.add_node(node).unwrap();
        }
        ring
    }

    #[test]
    fn test_empty_ring() {
        let topology = RingTopology::from_ring(&ring(10, &[]));
        assert!(topology.is_empty());
        assert_eq!(topology.spread(), None);
    }

    #[test]
    fn test_single_position_owns_everything() {
        let topology = RingTopology::from_ring(&ring(1, &["solo"]));
        let solo = topology.get("solo").unwrap();
        assert_eq!(solo.arcs, 1);
        assert_eq!(solo.share, 1.0);
    }

    #[test]
    fn test_shares_sum_to_one() {
        let topology = RingTopology::from_ring(&ring(100, &["a", "b", "c"]));
        let total: f64 = topology.iter().map(|(_, o)| o.share).sum();
        assert!((total - 1.0).abs() < 1e-9, "total share was {}", total);
        assert_eq!(topology.iter().map(|(_, o)| o.arcs).sum::<usize>(), 300);
    }

    #[test]
    fn test_spread_is_reasonable_with_many_vnodes() {
        let topology = RingTopology::from_ring(&ring(100, &["server1", "server2"]));
        let spread = topology.spread().unwrap();
        assert!(spread >= 1.0);
        assert!(spread < 1.6, "spread was {}", spread);
    }
}
