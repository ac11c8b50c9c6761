//! Shared, lock-guarded ring handle.
//!
//! A [`HashRing`] changes three things on every membership change. Readers
//! must never see one of them updated without the others, so the whole
//! ring sits behind a single readers-writer lock: membership changes hold
//! the write lock for the full update, lookups share the read lock.

use crate::error::Result;
use crate::node::{NodeName, RoutingKey};
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::ring::{HashRing, RingConfig};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to a ring shared between threads.
///
/// Clones refer to the same ring. There is no process-wide instance; the
/// owner constructs one and hands clones to its consumers.
#[derive(Debug)]
pub struct SharedRing<P: Partitioner = Md5Partitioner> {
    inner: Arc<RwLock<HashRing<P>>>,
}

impl<P: Partitioner> Clone for SharedRing<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedRing<Md5Partitioner> {
    pub fn new(config: RingConfig) -> Self {
        Self::from_ring(HashRing::with_config(config))
    }
}

impl Default for SharedRing<Md5Partitioner> {
    fn default() -> Self {
        Self::from_ring(HashRing::new())
    }
}

impl<P: Partitioner> From<HashRing<P>> for SharedRing<P> {
    fn from(ring: HashRing<P>) -> Self {
        Self::from_ring(ring)
    }
}

impl<P: Partitioner> SharedRing<P> {
    pub fn from_ring(ring: HashRing<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ring)),
        }
    }

    pub fn add_node(&self, node: &str) -> Result<()> {
        self.inner.write().add_node(node)
    }

    pub fn remove_node(&self, node: &str) -> Result<()> {
        self.inner.write().remove_node(node)
    }

    /// Owner of `key`, cloned out so the read lock is released on return.
    pub fn lookup(&self, key: &str) -> Result<Option<NodeName>> {
        Ok(self.inner.read().lookup(key)?.cloned())
    }

    pub fn lookup_key(&self, key: &RoutingKey) -> Option<NodeName> {
        self.inner.read().lookup_key(key).cloned()
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.inner.read().contains(node)
    }

    /// Run `f` against the ring under the read lock.
    ///
    /// Keep `f` short: membership changes wait until it returns.
    pub fn read<R>(&self, f: impl FnOnce(&HashRing<P>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Apply several membership changes as one atomic update.
    ///
    /// `f` runs against a copy of the ring that replaces the shared one
    /// only if `f` succeeds. Readers see either none or all of its changes,
    /// and an error leaves the ring exactly as it was.
    pub fn update<R>(&self, f: impl FnOnce(&mut HashRing<P>) -> Result<R>) -> Result<R> {
        let mut guard = self.inner.write();
        let mut next = guard.clone();
        let value = f(&mut next)?;
        *guard = next;
        Ok(value)
    }

    /// Point-in-time copy of the ring.
    pub fn snapshot(&self) -> HashRing<P> {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let ring: SharedRing = SharedRing::default();
        let other = ring.clone();

        ring.add_node("cell1").unwrap();
        assert_eq!(other.size(), 1);
        assert_eq!(other.lookup("rider:0001").unwrap().unwrap(), "cell1");
    }

    #[test]
    fn test_concurrent_lookups_during_membership_changes() {
        let ring: SharedRing = SharedRing::default();
        ring.add_node("cell1").unwrap();

        let readers: Vec<_> = (0..4)
            .map(|t| {
                let ring = ring.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = format!("rider-{}-{}", t, i);
                        let owner = ring.lookup(&key).unwrap();
                        // cell1 is never removed, so the ring is never empty.
                        let owner = owner.expect("ring has at least one member");
                        assert!(owner == "cell1" || owner == "cell2");
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            ring.add_node("cell2").unwrap();
            ring.remove_node("cell2").unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(ring.size(), 1);
        assert_eq!(ring.read(|r| r.position_count()), 100);
    }

    #[test]
    fn test_failed_update_leaves_ring_unchanged() {
        let ring: SharedRing = SharedRing::default();
        ring.add_node("cell1").unwrap();

        let err = ring
            .update(|r| {
                r.add_node("cell2")?;
                r.add_node("cell1")
            })
            .unwrap_err();
        assert_eq!(err, crate::Error::AlreadyExists("cell1".into()));
        assert_eq!(ring.size(), 1);
        assert!(!ring.contains("cell2"));
        assert_eq!(ring.read(|r| r.position_count()), 100);
    }

    #[test]
    fn test_update_is_applied_as_one_change() {
        let ring: SharedRing = SharedRing::default();
        ring.update(|r| {
            r.add_node("cell1")?;
            r.add_node("cell2")
        })
        .unwrap();
        assert_eq!(ring.size(), 2);

        let snapshot = ring.snapshot();
        ring.remove_node("cell1").unwrap();
        assert_eq!(snapshot.size(), 2);
        assert_eq!(ring.size(), 1);
    }
}
