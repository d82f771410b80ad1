//! Mitigation configuration and validation.
//!
//! [`MitigationConfig`] is an immutable value injected into every run.
//! Only the documented placeholder constants have defaults; the LRF
//! table is always supplied by the caller.

use crate::error::ConfigError;
use crate::lrf::LrfTable;
use serde::{Deserialize, Serialize};
use tarn_core::{FractionMap, PathwayMap};

/// Placeholder fraction split: 50 % particulate, 25 % DRP, 25 % DOP.
pub const DEFAULT_FRACTION_RATIOS: FractionMap<f64> = FractionMap([0.50, 0.25, 0.25]);

/// Fraction ratios may deviate from a sum of 1 by at most this much.
const RATIO_SUM_TOLERANCE: f64 = 1e-9;

// ── CoverageThresholds ─────────────────────────────────────────────

/// Coverage percentages that separate the coverage categories.
///
/// `coverage >= high` is High, `coverage >= medium` is Medium, any
/// positive coverage below that is Low.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageThresholds {
    /// Lower bound of Medium, in percent. Default: 2.0.
    pub medium: f64,
    /// Lower bound of High, in percent. Default: 4.0.
    pub high: f64,
}

impl Default for CoverageThresholds {
    fn default() -> Self {
        Self {
            medium: 2.0,
            high: 4.0,
        }
    }
}

// ── AgriculturalFilter ─────────────────────────────────────────────

/// Scales raw load down on reaches with little agricultural land.
///
/// A reach whose agricultural share is below `threshold_percent` keeps
/// only `raw × ag% / 100` of its load.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgriculturalFilter {
    /// Agricultural share below which the filter applies. Default: 25.0.
    pub threshold_percent: f64,
}

impl Default for AgriculturalFilter {
    fn default() -> Self {
        Self {
            threshold_percent: 25.0,
        }
    }
}

// ── MitigationConfig ───────────────────────────────────────────────

/// Everything the per-reach pipeline needs besides the reach itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MitigationConfig {
    /// Share of total load in each fraction. Must sum to 1.
    /// Default: [`DEFAULT_FRACTION_RATIOS`].
    pub fraction_ratios: FractionMap<f64>,
    /// Share of each fraction attributed to bank erosion, which
    /// mitigation cannot reach. Default: 0.5.
    pub bank_erosion_ratio: f64,
    /// Coverage category thresholds.
    pub thresholds: CoverageThresholds,
    /// Clay percentage above which wetlands have no effect. Default: 50.0.
    pub clay_threshold_percent: f64,
    /// Allowed deviation of a reach's pathway share sum from 1 before it
    /// is flagged. Default: 0.05.
    pub pathway_share_tolerance: f64,
    /// Pathways that mitigation acts on. Default: all.
    pub mitigated_pathways: PathwayMap<bool>,
    /// Optional agricultural land-use filter. Default: off.
    pub agricultural: Option<AgriculturalFilter>,
    /// Remaining-load factors.
    pub lrf: LrfTable,
}

impl MitigationConfig {
    /// Placeholder settings around a caller-supplied LRF table.
    pub fn with_lrf(lrf: LrfTable) -> Self {
        Self {
            fraction_ratios: DEFAULT_FRACTION_RATIOS,
            bank_erosion_ratio: 0.5,
            thresholds: CoverageThresholds::default(),
            clay_threshold_percent: 50.0,
            pathway_share_tolerance: 0.05,
            mitigated_pathways: PathwayMap::splat(true),
            agricultural: None,
            lrf,
        }
    }

    /// Validate all structural invariants, including LRF completeness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_settings()?;
        self.lrf.validate_complete(&self.mitigated_pathways)
    }

    /// Validate everything except LRF completeness.
    ///
    /// A run that never reaches a missing key can still succeed, so the
    /// scenario runner checks completeness lazily, per lookup.
    pub fn validate_settings(&self) -> Result<(), ConfigError> {
        // 1. Fraction ratios in [0, 1] and summing to 1.
        for (fraction, &r) in self.fraction_ratios.iter() {
            check_ratio(fraction.label(), r)?;
        }
        let sum = self.fraction_ratios.sum();
        if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(ConfigError::FractionRatiosSum { sum });
        }
        // 2. Bank erosion share.
        check_ratio("bank_erosion_ratio", self.bank_erosion_ratio)?;
        // 3. Coverage thresholds positive and ordered.
        let t = &self.thresholds;
        check_positive("thresholds.medium", t.medium)?;
        check_positive("thresholds.high", t.high)?;
        if t.medium > t.high {
            return Err(ConfigError::ThresholdOrder {
                medium: t.medium,
                high: t.high,
            });
        }
        // 4. Percent thresholds in [0, 100].
        check_percent("clay_threshold_percent", self.clay_threshold_percent)?;
        if let Some(ag) = &self.agricultural {
            check_percent("agricultural.threshold_percent", ag.threshold_percent)?;
        }
        // 5. Share tolerance.
        let tol = self.pathway_share_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "pathway_share_tolerance",
                value: tol,
            });
        }
        Ok(())
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRatio { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

fn check_percent(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}
