// ── Core identity types ──
//
// Devices and links are keyed by the string ids the exchange format
// carries; firewall rules by a numeric id unique within their router.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DeviceId ────────────────────────────────────────────────────────

/// Identifier of a device (a canvas node).
///
/// Ids issued by [`IdAllocator`](crate::IdAllocator) are decimal numbers,
/// but imported topologies may carry arbitrary strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is a plain decimal number.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── LinkId ──────────────────────────────────────────────────────────

/// Identifier of a link (a canvas edge).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Id for a freshly drawn link between two devices.
    pub fn between(a: &DeviceId, b: &DeviceId) -> Self {
        Self(format!("link-{a}-{b}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LinkId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for LinkId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── RuleId ──────────────────────────────────────────────────────────

/// Identifier of a firewall rule, increasing in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RuleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
