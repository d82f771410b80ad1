//! Coverage categories, the clay constraint, and factor application.

use crate::config::{CoverageThresholds, MitigationConfig};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tarn_core::{CoverageCategory, Fraction, Pathway};

/// Bucket a coverage percentage.
///
/// Non-finite and non-positive coverage is [`CoverageCategory::None`].
pub fn categorize(coverage_percent: f64, thresholds: &CoverageThresholds) -> CoverageCategory {
    if coverage_percent >= thresholds.high {
        CoverageCategory::High
    } else if coverage_percent >= thresholds.medium {
        CoverageCategory::Medium
    } else if coverage_percent > 0.0 {
        CoverageCategory::Low
    } else {
        CoverageCategory::None
    }
}

/// How mitigation applies to one reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReachMitigation {
    /// Coverage category. `None` outside the area of interest.
    pub category: CoverageCategory,
    /// Clay content exceeds the threshold, so every factor is 1.0.
    pub clay_constrained: bool,
}

/// Decide the category and clay constraint for a reach.
///
/// Reaches outside the area of interest are routed but never mitigated.
/// A NaN clay percentage never constrains; [`process_reach`] flags it.
///
/// [`process_reach`]: crate::reach::process_reach
pub fn assess(
    coverage_percent: f64,
    clay_percent: f64,
    in_scope: bool,
    config: &MitigationConfig,
) -> ReachMitigation {
    if !in_scope {
        return ReachMitigation::default();
    }
    ReachMitigation {
        category: categorize(coverage_percent, &config.thresholds),
        clay_constrained: clay_percent > config.clay_threshold_percent,
    }
}

/// The remaining-load factor for one (fraction, pathway) on a reach.
///
/// Returns 1.0 without a table lookup when the reach is clay-constrained,
/// has no coverage, the pathway is not eligible, or the fraction never
/// travels by that pathway.
pub fn remaining_factor(
    config: &MitigationConfig,
    reach: &ReachMitigation,
    fraction: Fraction,
    pathway: Pathway,
) -> Result<f64, ConfigError> {
    if reach.clay_constrained
        || reach.category == CoverageCategory::None
        || !config.mitigated_pathways[pathway]
        || (fraction.is_surface_only() && pathway != Pathway::SurfaceRunoff)
    {
        return Ok(1.0);
    }
    config.lrf.factor(reach.category, fraction, pathway)
}

/// Input load, applied factor, and resulting load for one pathway.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MitigationState {
    /// Load entering mitigation.
    pub input: f64,
    /// Remaining-load factor applied.
    pub factor: f64,
    /// `input × factor`.
    pub mitigated: f64,
}

impl Default for MitigationState {
    fn default() -> Self {
        Self {
            input: 0.0,
            factor: 1.0,
            mitigated: 0.0,
        }
    }
}

impl MitigationState {
    /// Load removed by mitigation.
    pub fn reduction(&self) -> f64 {
        self.input - self.mitigated
    }
}

/// Apply a remaining-load factor.
pub fn apply(load: f64, factor: f64) -> MitigationState {
    MitigationState {
        input: load,
        factor,
        mitigated: load * factor,
    }
}
