//! Router configuration.
//!
//! Loaded from a JSON file; every field has a default, so `{}` is a valid
//! configuration describing the two-cell local setup.

use crate::directory::CellDirectory;
use crate::error::{Result, RoutingError};
use crate::extract::envelope::DEFAULT_ROUTING_ATTRIBUTE;
use crate::extract::path::DEFAULT_PATH_PATTERN;
use corelib::{NodeName, RingConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Attribute the enricher stamps the chosen cell into.
pub const DEFAULT_CELL_ATTRIBUTE: &str = "CELL_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub ring: RingConfig,
    /// Cells to register and where each one is reached.
    pub cells: CellDirectory,
    /// Gateway route whose `:param` segment is the routing key.
    pub path_pattern: String,
    /// Notification attribute holding the routing key.
    pub routing_attribute: String,
    /// Attribute added to forwarded messages naming the chosen cell.
    pub cell_attribute: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let cells = [
            ("cell1", "http://localhost:3000"),
            ("cell2", "http://localhost:3001"),
        ]
        .into_iter()
        .filter_map(|(cell, target)| Some((NodeName::new(cell).ok()?, target.to_string())))
        .collect();

        Self {
            ring: RingConfig::default(),
            cells,
            path_pattern: DEFAULT_PATH_PATTERN.to_string(),
            routing_attribute: DEFAULT_ROUTING_ATTRIBUTE.to_string(),
            cell_attribute: DEFAULT_CELL_ATTRIBUTE.to_string(),
        }
    }
}

impl RouterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RoutingError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| RoutingError::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}
