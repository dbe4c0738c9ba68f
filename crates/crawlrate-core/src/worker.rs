//! Worker (proxy) identifiers.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Identifier of a worker that executes work items.
///
/// Usually a proxy IP address, but any string is accepted and kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as a network address, when it is one.
    pub fn addr(&self) -> Option<IpAddr> {
        self.0.trim().parse().ok()
    }
}

impl fmt::Display for WorkerId {
    /// Canonical address form when the identifier parses as an IP,
    /// the raw identifier otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr() {
            Some(addr) => write!(f, "{addr}"),
            None => f.write_str(&self.0),
        }
    }
}

impl From<&str> for WorkerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WorkerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
