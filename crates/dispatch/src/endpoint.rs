use std::fmt;

use courier_common::{Error, Result};

/// A parsed `component:path` endpoint key.
///
/// Only the component part selects configuration; endpoints that differ by
/// path share their component's formatter and processors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    component: String,
    path: String,
}

impl EndpointKey {
    /// Parse `component:path`, `component://path` or `component:path?options`.
    /// Options are ignored.
    pub fn parse(key: &str) -> Result<Self> {
        if key.trim().is_empty() {
            return Err(Error::invalid_argument("endpoint key is empty"));
        }
        let Some((component, rest)) = key.split_once(':') else {
            return Err(Error::invalid_argument(format!(
                "endpoint key {key:?} has no component (expected component:path)"
            )));
        };
        if component.is_empty() {
            return Err(Error::invalid_argument(format!(
                "endpoint key {key:?} has an empty component"
            )));
        }
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let path = rest.split_once('?').map_or(rest, |(path, _)| path);
        Ok(Self {
            component: component.to_string(),
            path: path.to_string(),
        })
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.path)
    }
}
