//! Runner configuration, area of interest, and construction errors.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use tarn_core::ReachId;
use tarn_load::ConfigError;
use tarn_network::{ReachNetwork, TopologyError};

// ── AreaOfInterest ─────────────────────────────────────────────────

/// Which reaches receive mitigation and count as in scope.
///
/// The whole network is always routed. Reaches outside the area keep
/// their baseline load and are marked `in_scope = false` in the result
/// table, but still contribute to downstream accumulation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaOfInterest {
    /// Every reach is in scope.
    #[default]
    All,
    /// Exactly these reaches.
    Reaches(Vec<ReachId>),
    /// These reaches and everything upstream of them, e.g. the reaches
    /// feeding a lake.
    CatchmentOf(Vec<ReachId>),
}

impl AreaOfInterest {
    /// Resolve to an in-scope mask indexed by arena index.
    pub fn resolve(&self, network: &ReachNetwork) -> Result<Vec<bool>, TopologyError> {
        match self {
            Self::All => Ok(vec![true; network.len()]),
            Self::Reaches(ids) => {
                let mut mask = vec![false; network.len()];
                for &id in ids {
                    mask[network.require(id)?] = true;
                }
                Ok(mask)
            }
            Self::CatchmentOf(targets) => {
                let mut mask = vec![false; network.len()];
                for id in network.catchment_of(targets)? {
                    mask[network.require(id)?] = true;
                }
                Ok(mask)
            }
        }
    }
}

// ── RunnerConfig ───────────────────────────────────────────────────

/// Configuration for a [`ScenarioRunner`](crate::ScenarioRunner).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of scenario worker threads. `None` = 1 (sequential).
    pub worker_count: Option<usize>,
    /// Keep the per-fraction, per-pathway breakdown on every result row.
    /// Default: false.
    pub keep_breakdown: bool,
    /// Reaches that receive mitigation. Default: all.
    pub area_of_interest: AreaOfInterest,
}

impl RunnerConfig {
    /// Resolve the actual worker count.
    ///
    /// Explicit values are clamped to `[1, 64]`. `None` runs scenarios
    /// one after another on the calling thread.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => 1,
        }
    }
}

// ── RunnerError ────────────────────────────────────────────────────

/// Errors detected while constructing a
/// [`ScenarioRunner`](crate::ScenarioRunner).
///
/// These concern shared inputs, so no scenario could run.
#[derive(Debug, PartialEq)]
pub enum RunnerError {
    /// Mitigation settings failed validation.
    Config(ConfigError),
    /// The area of interest names a reach outside the network.
    Topology(TopologyError),
    /// A network reach has no entry in the reach table.
    MissingAttributes {
        /// The reach without attributes.
        reach: ReachId,
    },
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "mitigation config: {e}"),
            Self::Topology(e) => write!(f, "area of interest: {e}"),
            Self::MissingAttributes { reach } => {
                write!(f, "reach {reach} has no attributes")
            }
        }
    }
}

impl Error for RunnerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Topology(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RunnerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TopologyError> for RunnerError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}
