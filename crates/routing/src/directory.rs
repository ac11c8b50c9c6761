//! Static cell directory.
//!
//! The ring only picks a cell name. The directory turns that name into the
//! destination the router actually uses: a base URL for the HTTP gateway,
//! a queue or topic for the message enricher.

use corelib::NodeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cell name to target table.
///
/// Serialized as a plain JSON object: `{"cell1": "http://localhost:3000"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellDirectory {
    targets: BTreeMap<NodeName, String>,
}

impl CellDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the target of `cell`, returning the old target.
    pub fn insert(&mut self, cell: NodeName, target: impl Into<String>) -> Option<String> {
        self.targets.insert(cell, target.into())
    }

    pub fn remove(&mut self, cell: &str) -> Option<String> {
        self.targets.remove(cell)
    }

    pub fn target(&self, cell: &str) -> Option<&str> {
        self.targets.get(cell).map(String::as_str)
    }

    /// Cell names, sorted.
    pub fn cells(&self) -> impl Iterator<Item = &NodeName> + '_ {
        self.targets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeName, &str)> + '_ {
        self.targets.iter().map(|(cell, target)| (cell, target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<(NodeName, String)> for CellDirectory {
    fn from_iter<I: IntoIterator<Item = (NodeName, String)>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}
