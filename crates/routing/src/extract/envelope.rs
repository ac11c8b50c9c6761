//! Queued notification routing keys.
//!
//! Messages arrive as a JSON notification body carrying the payload in
//! `Message` and string attributes in `MessageAttributes`:
//!
//! ```json
//! {
//!   "Message": "Message for rider 0001",
//!   "MessageAttributes": {
//!     "RIDER_ID": { "Type": "String", "Value": "rider:0001" }
//!   }
//! }
//! ```

use crate::error::{Result, RoutingError};
use crate::extract::KeyExtractor;
use corelib::RoutingKey;
use serde::Deserialize;
use std::collections::HashMap;

/// Default attribute holding the routing key.
pub const DEFAULT_ROUTING_ATTRIBUTE: &str = "RIDER_ID";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Notification {
    #[serde(default)]
    message: String,
    #[serde(default)]
    message_attributes: HashMap<String, Attribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Attribute {
    #[serde(default)]
    value: Option<String>,
}

/// The parts of a notification the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeFields {
    pub message: String,
    pub routing_key: RoutingKey,
}

/// Reads the routing key from a named notification attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeExtractor {
    attribute: String,
}

impl EnvelopeExtractor {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Parse a notification body.
    ///
    /// # Errors
    /// - `MalformedPayload` if `body` is not a JSON notification
    /// - `MissingRoutingKey` if the attribute is absent or empty
    pub fn parse(&self, body: &str) -> Result<EnvelopeFields> {
        let mut notification: Notification = serde_json::from_str(body)?;
        let value = notification
            .message_attributes
            .remove(&self.attribute)
            .and_then(|attribute| attribute.value)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RoutingError::MissingRoutingKey(self.attribute.clone()))?;

        Ok(EnvelopeFields {
            message: notification.message,
            routing_key: RoutingKey::new(value)?,
        })
    }
}

impl Default for EnvelopeExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTING_ATTRIBUTE)
    }
}

impl KeyExtractor for EnvelopeExtractor {
    type Input = str;

    fn extract_key(&self, body: &str) -> Result<RoutingKey> {
        Ok(self.parse(body)?.routing_key)
    }

    fn name(&self) -> &'static str {
        "EnvelopeExtractor"
    }
}
