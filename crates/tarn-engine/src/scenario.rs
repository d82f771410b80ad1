//! Scenario inputs, shared reach attributes, and scenario errors.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tarn_core::{ReachId, ScenarioName};
use tarn_load::{ConfigError, PathwayShares};

// ── ReachAttributes ────────────────────────────────────────────────

/// Per-reach data shared by every scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReachAttributes {
    /// Fraction of arriving upstream load that survives this reach.
    /// Expected in `(0, 1]`; values outside are flagged, not rejected.
    pub attenuation: f64,
    /// Soil clay content, in percent.
    pub clay_percent: f64,
    /// Wetland coverage in percent, by named variant
    /// (e.g. `"combined"`, `"surface-only"`).
    #[serde(default)]
    pub coverage: IndexMap<String, f64>,
    /// Pathway shares, if known.
    #[serde(default)]
    pub pathway_shares: Option<PathwayShares>,
    /// Agricultural land share, in percent, if known.
    #[serde(default)]
    pub ag_percent: Option<f64>,
}

impl ReachAttributes {
    /// Attributes with no coverage, shares, or land-use data.
    pub fn new(attenuation: f64, clay_percent: f64) -> Self {
        Self {
            attenuation,
            clay_percent,
            coverage: IndexMap::new(),
            pathway_shares: None,
            ag_percent: None,
        }
    }

    /// Builder-style coverage variant.
    pub fn with_coverage(mut self, variant: impl Into<String>, percent: f64) -> Self {
        self.coverage.insert(variant.into(), percent);
        self
    }

    /// Builder-style pathway shares.
    pub fn with_shares(mut self, shares: PathwayShares) -> Self {
        self.pathway_shares = Some(shares);
        self
    }

    /// Builder-style agricultural share.
    pub fn with_ag_percent(mut self, percent: f64) -> Self {
        self.ag_percent = Some(percent);
        self
    }
}

/// Attributes for every reach, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReachTable {
    reaches: IndexMap<ReachId, ReachAttributes>,
}

impl ReachTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one reach's attributes.
    pub fn insert(&mut self, reach: ReachId, attributes: ReachAttributes) {
        self.reaches.insert(reach, attributes);
    }

    /// Attributes of one reach.
    pub fn get(&self, reach: ReachId) -> Option<&ReachAttributes> {
        self.reaches.get(&reach)
    }

    /// Position of a reach in the table.
    pub fn index_of(&self, reach: ReachId) -> Option<usize> {
        self.reaches.get_index_of(&reach)
    }

    /// Attributes at a position returned by [`index_of`](Self::index_of).
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    pub fn by_index(&self, idx: usize) -> &ReachAttributes {
        &self.reaches[idx]
    }

    /// Number of reaches.
    pub fn len(&self) -> usize {
        self.reaches.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.reaches.is_empty()
    }

    /// Whether any reach defines the named coverage variant.
    pub fn has_variant(&self, variant: &str) -> bool {
        self.reaches.values().any(|a| a.coverage.contains_key(variant))
    }
}

impl FromIterator<(ReachId, ReachAttributes)> for ReachTable {
    fn from_iter<I: IntoIterator<Item = (ReachId, ReachAttributes)>>(iter: I) -> Self {
        Self {
            reaches: iter.into_iter().collect(),
        }
    }
}

// ── ScenarioSpec ───────────────────────────────────────────────────

/// One scenario: a name, raw loads, and which coverage to apply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Unique name.
    pub name: ScenarioName,
    /// Raw generated load per reach. Must cover every network reach.
    pub raw_loads: IndexMap<ReachId, f64>,
    /// Name of the coverage variant to read from [`ReachAttributes`].
    pub coverage_variant: String,
    /// Attenuation overrides for this scenario only.
    #[serde(default)]
    pub attenuation_override: IndexMap<ReachId, f64>,
}

impl ScenarioSpec {
    /// A scenario with no loads yet.
    pub fn new(name: impl Into<ScenarioName>, coverage_variant: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_loads: IndexMap::new(),
            coverage_variant: coverage_variant.into(),
            attenuation_override: IndexMap::new(),
        }
    }

    /// Builder-style raw loads.
    pub fn with_loads(mut self, loads: impl IntoIterator<Item = (ReachId, f64)>) -> Self {
        self.raw_loads.extend(loads);
        self
    }

    /// Builder-style attenuation override for one reach.
    pub fn with_attenuation(mut self, reach: ReachId, attenuation: f64) -> Self {
        self.attenuation_override.insert(reach, attenuation);
        self
    }
}

// ── ScenarioStage ──────────────────────────────────────────────────

/// Pipeline stage of a scenario run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioStage {
    /// Resolving raw loads, coverage, and attenuation.
    Load,
    /// Splitting load into fractions and bank erosion.
    Split,
    /// Distributing mitigable load across pathways.
    Distribute,
    /// Applying remaining-load factors.
    Mitigate,
    /// Network accumulation.
    Accumulate,
    /// Merging rows into the result table.
    Merge,
}

impl fmt::Display for ScenarioStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Load => "load",
            Self::Split => "split",
            Self::Distribute => "distribute",
            Self::Mitigate => "mitigate",
            Self::Accumulate => "accumulate",
            Self::Merge => "merge",
        };
        f.write_str(s)
    }
}

// ── ScenarioError ──────────────────────────────────────────────────

/// Errors that abort one scenario.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioError {
    /// A network reach has no raw load in this scenario.
    MissingLoad {
        /// The reach without a load.
        reach: ReachId,
    },
    /// The scenario gives a load or override for a reach outside the
    /// network.
    UnknownReach {
        /// The unknown reach.
        reach: ReachId,
    },
    /// No reach defines the requested coverage variant.
    UnknownCoverageVariant {
        /// The requested variant.
        variant: String,
    },
    /// Another scenario in the same run has this name.
    DuplicateName {
        /// The repeated name.
        name: ScenarioName,
    },
    /// A configuration lookup failed while processing a reach.
    Config {
        /// The reach being processed.
        reach: ReachId,
        /// The underlying error.
        source: ConfigError,
    },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLoad { reach } => write!(f, "no raw load for reach {reach}"),
            Self::UnknownReach { reach } => write!(f, "reach {reach} is not in the network"),
            Self::UnknownCoverageVariant { variant } => {
                write!(f, "no reach defines coverage variant '{variant}'")
            }
            Self::DuplicateName { name } => write!(f, "scenario name '{name}' is not unique"),
            Self::Config { reach, source } => write!(f, "reach {reach}: {source}"),
        }
    }
}

impl Error for ScenarioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A scenario error together with the stage it happened in.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioFailure {
    /// Stage that failed.
    pub stage: ScenarioStage,
    /// What went wrong.
    pub error: ScenarioError,
}

impl fmt::Display for ScenarioFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage: {}", self.stage, self.error)
    }
}

impl Error for ScenarioFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}
