//! Hash ring data structure.
//!
//! The ring and the ownership map are held as a single ordered map from
//! position to owning node, so a position can never exist without an owner
//! or the other way round. The set of real nodes is kept next to it.

use crate::error::{Error, Result};
use crate::node::{NodeName, RoutingKey};
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::ring::RingPosition;
use crate::vnode::VirtualNode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Default number of virtual nodes placed for every real node.
pub const DEFAULT_VIRTUAL_NODES: usize = 100;

fn default_virtual_nodes() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_VIRTUAL_NODES).unwrap_or(NonZeroUsize::MIN)
}

/// Construction-time ring settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual nodes per real node. More gives a smoother split of the
    /// keyspace at the cost of a larger ring.
    pub virtual_nodes: NonZeroUsize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: default_virtual_nodes(),
        }
    }
}

impl RingConfig {
    pub fn with_virtual_nodes(virtual_nodes: NonZeroUsize) -> Self {
        Self { virtual_nodes }
    }
}

/// Consistent hash ring over named nodes.
///
/// Not internally synchronized; wrap it in [`SharedRing`](crate::ring::SharedRing)
/// to share it between threads.
///
/// # Example
///
/// ```rust
/// use corelib::HashRing;
///
/// let mut ring = HashRing::new();
/// ring.add_node("server1").unwrap();
/// ring.add_node("server2").unwrap();
///
/// let owner = ring.lookup("12345").unwrap().unwrap();
/// assert!(owner == "server1" || owner == "server2");
/// ```
#[derive(Debug, Clone)]
pub struct HashRing<P: Partitioner = Md5Partitioner> {
    config: RingConfig,
    partitioner: P,
    positions: BTreeMap<RingPosition, NodeName>,
    nodes: BTreeSet<NodeName>,
}

impl HashRing<Md5Partitioner> {
    /// Empty ring with 100 virtual nodes per node and MD5 positions.
    pub fn new() -> Self {
        Self::with_config(RingConfig::default())
    }

    pub fn with_config(config: RingConfig) -> Self {
        Self::with_partitioner(config, Md5Partitioner)
    }
}

impl Default for HashRing<Md5Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> HashRing<P> {
    pub fn with_partitioner(config: RingConfig, partitioner: P) -> Self {
        Self {
            config,
            partitioner,
            positions: BTreeMap::new(),
            nodes: BTreeSet::new(),
        }
    }

    /// Add a node and its virtual nodes to the ring.
    ///
    /// # Errors
    /// - `InvalidArgument` if `node` is empty
    /// - `AlreadyExists` if `node` is already a member
    ///
    /// The ring is untouched when an error is returned.
    pub fn add_node(&mut self, node: &str) -> Result<()> {
        let node = NodeName::new(node)?;
        self.insert(node)
    }

    /// Typed form of [`add_node`](Self::add_node).
    pub fn insert(&mut self, node: NodeName) -> Result<()> {
        if self.nodes.contains(&node) {
            return Err(Error::AlreadyExists(node.to_string()));
        }

        for vnode in VirtualNode::replicas(&self.partitioner, &node, self.virtual_nodes()) {
            if let Some(previous) = self.positions.insert(vnode.position, vnode.node) {
                // Last writer wins; the earlier owner loses this one position.
                warn!(
                    position = %vnode.position,
                    previous = %previous,
                    node = %node,
                    "ring position collision"
                );
            }
        }

        debug!(
            node = %node,
            vnodes = self.virtual_nodes(),
            positions = self.positions.len(),
            "added node to ring"
        );
        self.nodes.insert(node);
        Ok(())
    }

    /// Remove a node and all of its virtual nodes.
    ///
    /// # Errors
    /// - `NotFound` if `node` is not a member (this includes the empty name)
    pub fn remove_node(&mut self, node: &str) -> Result<()> {
        let Some(node) = self.nodes.take(node) else {
            return Err(Error::NotFound(node.to_string()));
        };

        // Positions are re-derived, so this must use the same derivation as insert.
        for vnode in VirtualNode::replicas(&self.partitioner, &node, self.virtual_nodes()) {
            if self.positions.get(&vnode.position) == Some(&node) {
                self.positions.remove(&vnode.position);
            }
        }

        debug!(
            node = %node,
            positions = self.positions.len(),
            "removed node from ring"
        );
        Ok(())
    }

    /// Find the node responsible for `key`.
    ///
    /// Returns `Ok(None)` when the ring has no members.
    ///
    /// # Errors
    /// - `InvalidArgument` if `key` is empty
    pub fn lookup(&self, key: &str) -> Result<Option<&NodeName>> {
        if key.is_empty() {
            return Err(Error::InvalidArgument(
                "key must be a non-empty string".to_string(),
            ));
        }
        Ok(self.owner_of(self.partitioner.position(key.as_bytes())))
    }

    /// Typed form of [`lookup`](Self::lookup); a `RoutingKey` is never empty.
    pub fn lookup_key(&self, key: &RoutingKey) -> Option<&NodeName> {
        self.owner_of(self.partitioner.position(key.as_bytes()))
    }

    /// Owner of the clockwise successor of `position`: the first ring
    /// position at or after it, wrapping to the start of the ring.
    ///
    /// # Performance
    /// - **Time**: O(log n) where n = number of positions on the ring
    pub fn owner_of(&self, position: RingPosition) -> Option<&NodeName> {
        self.positions
            .range(position..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, node)| node)
    }

    /// Number of real nodes in the ring.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Real nodes, sorted by name.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeName> + '_ {
        self.nodes.iter()
    }

    /// Ring positions in ascending order with their owners.
    pub fn positions(&self) -> impl Iterator<Item = (RingPosition, &NodeName)> + '_ {
        self.positions.iter().map(|(position, node)| (*position, node))
    }

    /// Number of positions on the ring (`virtual_nodes * size()` barring collisions).
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn virtual_nodes(&self) -> usize {
        self.config.virtual_nodes.get()
    }

    pub fn config(&self) -> RingConfig {
        self.config
    }

    pub fn partitioner(&self) -> &P {
        &self.partitioner
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Count how many of `keys` each member receives.
    ///
    /// Every member appears in the result, including members that receive
    /// no keys. Empty keys are skipped.
    pub fn distribution<I, K>(&self, keys: I) -> BTreeMap<NodeName, usize>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut counts: BTreeMap<NodeName, usize> =
            self.nodes.iter().map(|node| (node.clone(), 0)).collect();
        for key in keys {
            if let Ok(Some(node)) = self.lookup(key.as_ref()) {
                if let Some(count) = counts.get_mut(node) {
                    *count += 1;
                }
            }
        }
        counts
    }
}

/// Builder for constructing a [`HashRing`] with an initial membership.
///
/// # Example
///
/// ```rust
/// use corelib::RingBuilder;
/// use std::num::NonZeroUsize;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(NonZeroUsize::new(8).unwrap())
///     .add_node("cell1")
///     .add_node("cell2")
///     .build()
///     .unwrap();
/// assert_eq!(ring.position_count(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<P: Partitioner = Md5Partitioner> {
    config: RingConfig,
    partitioner: P,
    nodes: Vec<String>,
}

impl RingBuilder<Md5Partitioner> {
    pub fn new() -> Self {
        Self {
            config: RingConfig::default(),
            partitioner: Md5Partitioner,
            nodes: Vec::new(),
        }
    }
}

impl Default for RingBuilder<Md5Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    pub fn with_vnodes(mut self, virtual_nodes: NonZeroUsize) -> Self {
        self.config.virtual_nodes = virtual_nodes;
        self
    }

    pub fn with_config(mut self, config: RingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            config: self.config,
            partitioner,
            nodes: self.nodes,
        }
    }

    pub fn add_node(mut self, node: impl Into<String>) -> Self {
        self.nodes.push(node.into());
        self
    }

    /// Build the ring, adding nodes in the order given.
    ///
    /// # Errors
    /// The first error returned by [`HashRing::add_node`].
    pub fn build(self) -> Result<HashRing<P>> {
        let mut ring = HashRing::with_partitioner(self.config, self.partitioner);
        for node in &self.nodes {
            ring.add_node(node)?;
        }
        Ok(ring)
    }
}
