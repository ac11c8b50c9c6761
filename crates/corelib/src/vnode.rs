//! Virtual node derivation.
//!
//! A node named `cell1` with `v` virtual nodes occupies the positions of the
//! labels `cell1-vn-0` through `cell1-vn-{v-1}`, each hashed by the ring's
//! partitioner (MD5 by default, read as a 128-bit big-endian position).
//! Spreading a node over many labels keeps each member's share of the
//! keyspace close to `1/n`.
//!
//! Virtual nodes are never stored. A node's positions are re-derived from its
//! name whenever they are needed, so adding and removing a node must go
//! through [`VirtualNode::replicas`] to stay in agreement.

use crate::node::NodeName;
use crate::partitioner::Partitioner;
use crate::ring::RingPosition;

/// A virtual node on the hash ring.
///
/// Represents a single position owned by a physical node.
///
/// # Invariants
///
/// - The position is a pure function of `(partitioner, node, index)`
/// - Every `VirtualNode` belongs to exactly one physical node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode {
    /// Position on the ring: the hash of `"<node>-vn-<index>"`.
    pub position: RingPosition,

    /// The physical node that owns this virtual node.
    pub node: NodeName,

    /// Replica index within the owning node, in `0..virtual_nodes`.
    pub index: usize,
}

impl VirtualNode {
    /// Label hashed to place replica `index` of `node`.
    ///
    /// # Example
    /// ```rust
    /// use corelib::VirtualNode;
    ///
    /// assert_eq!(VirtualNode::label("server1", 7), "server1-vn-7");
    /// ```
    pub fn label(node: &str, index: usize) -> String {
        format!("{}-vn-{}", node, index)
    }

    /// Derive replica `index` of `node`.
    ///
    /// # Performance
    /// - **Time**: O(k) where k = length of the label (formatting + hashing)
    /// - **Space**: O(k) temporary for the formatted label
    pub fn derive<P: Partitioner>(partitioner: &P, node: &NodeName, index: usize) -> Self {
        let label = Self::label(node.as_str(), index);
        Self {
            position: partitioner.position(label.as_bytes()),
            node: node.clone(),
            index,
        }
    }

    /// Derive replicas `0..count` of `node`, in index order.
    pub fn replicas<'a, P: Partitioner>(
        partitioner: &'a P,
        node: &'a NodeName,
        count: usize,
    ) -> impl Iterator<Item = VirtualNode> + 'a {
        (0..count).map(move |index| Self::derive(partitioner, node, index))
    }

    #[inline]
    pub fn position(&self) -> RingPosition {
        self.position
    }

    #[inline]
    pub fn node(&self) -> &NodeName {
        &self.node
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VNode(position={}, node={}, index={})",
            self.position, self.node, self.index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::Md5Partitioner;

    fn name(s: &str) -> NodeName {
        NodeName::new(s).unwrap()
    }

    #[test]
    fn test_vnode_label() {
        assert_eq!(VirtualNode::label("cell1", 0), "cell1-vn-0");
        assert_eq!(VirtualNode::label("cell1", 99), "cell1-vn-99");
    }

    #[test]
    fn test_vnode_derive_is_deterministic() {
        let p = Md5Partitioner;
        let a = VirtualNode::derive(&p, &name("server1"), 3);
        let b = VirtualNode::derive(&p, &name("server1"), 3);
        assert_eq!(a, b);
        assert_eq!(a.position(), p.position(b"server1-vn-3"));
    }

    #[test]
    fn test_vnode_replicas() {
        let p = Md5Partitioner;
        let node = name("server1");
        let vnodes: Vec<_> = VirtualNode::replicas(&p, &node, 4).collect();

        assert_eq!(vnodes.len(), 4);
        // Should have different positions but the same owner
        for (i, vnode) in vnodes.iter().enumerate() {
            assert_eq!(vnode.index, i);
            assert_eq!(vnode.node(), &node);
        }
        assert_ne!(vnodes[0].position(), vnodes[1].position());
    }
}
