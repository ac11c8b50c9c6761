//! Request and message dispatch.
//!
//! The dispatcher is the router side of the ring: it extracts a routing
//! key, asks the ring for a cell, and resolves the cell to a target. It
//! never sends anything itself; transports act on the [`Route`] or
//! [`Forward`] it returns.
//!
//! An empty ring is not an error. `Ok(None)` tells the caller there is
//! no destination and the request should be dropped.

use crate::config::RouterConfig;
use crate::directory::CellDirectory;
use crate::error::{Result, RoutingError};
use crate::extract::{EnvelopeExtractor, KeyExtractor, PathPattern};
use corelib::{NodeName, RoutingKey, SharedRing};
use metrics::counter;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub cell: NodeName,
    pub target: String,
}

/// A string attribute on a forwarded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForwardAttribute {
    pub data_type: String,
    pub string_value: String,
}

impl ForwardAttribute {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            data_type: "String".to_string(),
            string_value: value.into(),
        }
    }
}

/// A message ready to republish, tagged with its cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forward {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "MessageAttributes")]
    pub attributes: BTreeMap<String, ForwardAttribute>,
    #[serde(skip)]
    pub route: Route,
}

/// Routes keys, request paths and queued messages to cells.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    ring: SharedRing,
    directory: CellDirectory,
    paths: PathPattern,
    envelopes: EnvelopeExtractor,
    cell_attribute: String,
}

impl Dispatcher {
    /// Build a dispatcher and register every configured cell on a new ring.
    pub fn new(config: RouterConfig) -> Result<Self> {
        let ring = SharedRing::new(config.ring);
        ring.update(|ring| {
            for cell in config.cells.cells() {
                ring.insert(cell.clone())?;
            }
            Ok(())
        })?;
        Self::with_ring(ring, config)
    }

    /// Build a dispatcher over an existing ring. Membership is left as is.
    pub fn with_ring(ring: SharedRing, config: RouterConfig) -> Result<Self> {
        let paths = PathPattern::parse(&config.path_pattern)?;
        debug!(
            cells = config.cells.len(),
            pattern = %paths.as_str(),
            "dispatcher ready"
        );
        Ok(Self {
            ring,
            directory: config.cells,
            paths,
            envelopes: EnvelopeExtractor::new(config.routing_attribute),
            cell_attribute: config.cell_attribute,
        })
    }

    /// Shared ring handle, for whoever manages cell membership.
    pub fn ring(&self) -> &SharedRing {
        &self.ring
    }

    pub fn directory(&self) -> &CellDirectory {
        &self.directory
    }

    /// Route a raw key.
    ///
    /// # Errors
    /// - `Ring(InvalidArgument)` if `key` is empty
    /// - `UnknownCell` if the chosen cell has no target
    pub fn route_key(&self, key: &str) -> Result<Option<Route>> {
        let key = RoutingKey::new(key)?;
        self.route(&key)
    }

    /// Route an already validated key.
    pub fn route(&self, key: &RoutingKey) -> Result<Option<Route>> {
        let Some(cell) = self.ring.lookup_key(key) else {
            warn!(key = %key, "no cells registered, dropping");
            counter!("cellring_dropped_total", "reason" => "no_cells").increment(1);
            return Ok(None);
        };

        let Some(target) = self.directory.target(cell.as_str()) else {
            warn!(key = %key, cell = %cell, "cell has no target");
            counter!("cellring_dropped_total", "reason" => "unknown_cell").increment(1);
            return Err(RoutingError::UnknownCell(cell));
        };

        info!(key = %key, cell = %cell, destination = %target, "routed");
        counter!("cellring_routed_total", "cell" => cell.to_string()).increment(1);
        Ok(Some(Route {
            target: target.to_string(),
            cell,
        }))
    }

    /// Route a gateway request by its path.
    pub fn route_path(&self, path: &str) -> Result<Option<Route>> {
        let key = self.paths.extract_key(path)?;
        debug!(extractor = self.paths.name(), key = %key, "extracted routing key");
        self.route(&key)
    }

    /// Route a queued notification and build the message to forward.
    ///
    /// The forwarded message keeps the original payload and carries the
    /// chosen cell in the configured cell attribute.
    pub fn enrich(&self, body: &str) -> Result<Option<Forward>> {
        let fields = self.envelopes.parse(body)?;
        debug!(
            extractor = self.envelopes.name(),
            key = %fields.routing_key,
            "extracted routing key"
        );
        let Some(route) = self.route(&fields.routing_key)? else {
            return Ok(None);
        };

        let mut attributes = BTreeMap::new();
        attributes.insert(
            self.cell_attribute.clone(),
            ForwardAttribute::string(route.cell.as_str()),
        );
        Ok(Some(Forward {
            message: fields.message,
            attributes,
            route,
        }))
    }
}
