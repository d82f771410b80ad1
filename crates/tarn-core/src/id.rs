//! Strongly-typed identifiers for reaches and scenarios.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a river reach within a network.
///
/// Typically the segment number assigned by the national river
/// network, but any stable unique integer works.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReachId(pub u64);

impl fmt::Display for ReachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ReachId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Hydrological sequence number of a reach.
///
/// Ascending order visits every reach after all reaches that drain
/// into it. The network validates this on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HydroSeq(pub u64);

impl fmt::Display for HydroSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for HydroSeq {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Name of a mitigation scenario, unique within one run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioName(pub String);

impl ScenarioName {
    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScenarioName {
    fn from(v: &str) -> Self {
        Self(v.to_owned())
    }
}

impl From<String> for ScenarioName {
    fn from(v: String) -> Self {
        Self(v)
    }
}
