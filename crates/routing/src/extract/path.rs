//! Request path routing keys.
//!
//! A pattern such as `/api/:riderId` names one path segment as the routing
//! key. Paths may continue past the pattern, so `/api/42/orders/7` routes
//! on `42`.

use crate::error::{Result, RoutingError};
use crate::extract::KeyExtractor;
use corelib::RoutingKey;

/// Default gateway route.
pub const DEFAULT_PATH_PATTERN: &str = "/api/:riderId";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

/// Parsed route pattern with exactly one `:param` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pattern: String,
    param: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason| RoutingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut param = None;
        let mut segments = Vec::new();
        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some("") => return Err(invalid("parameter has no name")),
                Some(name) => {
                    if param.replace(name.to_string()).is_some() {
                        return Err(invalid("more than one parameter"));
                    }
                    segments.push(Segment::Param);
                }
                None => segments.push(Segment::Literal(segment.to_string())),
            }
        }

        let param = param.ok_or_else(|| invalid("no parameter segment"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            param,
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Name of the `:param` segment, without the colon.
    pub fn param_name(&self) -> &str {
        &self.param
    }

    /// The path segment in the parameter position, if `path` matches.
    pub fn extract<'a>(&self, path: &'a str) -> Option<&'a str> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut parts = path.split('/').filter(|s| !s.is_empty());

        let mut key = None;
        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal != part => return None,
                Segment::Literal(_) => {}
                Segment::Param => key = Some(part),
            }
        }
        key
    }
}

impl Default for PathPattern {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATH_PATTERN.to_string(),
            param: "riderId".to_string(),
            segments: vec![Segment::Literal("api".to_string()), Segment::Param],
        }
    }
}

impl KeyExtractor for PathPattern {
    type Input = str;

    fn extract_key(&self, path: &str) -> Result<RoutingKey> {
        let key = self
            .extract(path)
            .ok_or_else(|| RoutingError::MissingRoutingKey(path.to_string()))?;
        Ok(RoutingKey::new(key)?)
    }

    fn name(&self) -> &'static str {
        "PathPattern"
    }
}
