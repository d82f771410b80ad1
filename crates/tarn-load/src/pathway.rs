//! Distribution of mitigable load across transport pathways.

use serde::{Deserialize, Serialize};
use tarn_core::{Fraction, Pathway, PathwayMap, QualityFlag, QualityFlags};

/// A reach's pathway shares as fractions of one.
///
/// Shares are used exactly as given. A sum that drifts from 1 is flagged
/// by [`distribute`], never renormalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathwayShares(pub PathwayMap<f64>);

impl PathwayShares {
    /// Shares from fractions of one.
    pub fn new(shares: PathwayMap<f64>) -> Self {
        Self(shares)
    }

    /// Shares from percentages, as pathway tables are usually published.
    pub fn from_percent(percent: PathwayMap<f64>) -> Self {
        Self(percent.map(|_, v| v / 100.0))
    }

    /// Share for one pathway.
    pub fn get(&self, pathway: Pathway) -> f64 {
        self.0[pathway]
    }

    /// Sum of all shares.
    pub fn sum(&self) -> f64 {
        self.0.sum()
    }

    /// Whether the sum is within `tolerance` of 1.
    pub fn sums_to_one(&self, tolerance: f64) -> bool {
        (self.sum() - 1.0).abs() <= tolerance
    }
}

/// One fraction's mitigable load spread across pathways.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Distribution {
    /// Load assigned to each pathway.
    pub loads: PathwayMap<f64>,
    /// Load that could not be attributed to any pathway because the
    /// reach has no share table. Carried through unmitigated.
    pub unassigned: f64,
    /// Data-quality observations made while distributing.
    pub flags: QualityFlags,
}

/// Spread `mitigable` load of `fraction` across pathways.
///
/// Surface-only fractions go entirely to surface runoff; every other
/// pathway gets exactly zero. Dissolved fractions use `shares` as given.
pub fn distribute(
    mitigable: f64,
    fraction: Fraction,
    shares: Option<&PathwayShares>,
    tolerance: f64,
) -> Distribution {
    let mut out = Distribution::default();
    if fraction.is_surface_only() {
        out.loads[Pathway::SurfaceRunoff] = mitigable;
        return out;
    }
    match shares {
        Some(shares) => {
            if !shares.sums_to_one(tolerance) {
                out.flags.insert(QualityFlag::PathwayShareSum);
            }
            out.loads = shares.0.map(|_, &s| mitigable * s);
        }
        None => {
            out.flags.insert(QualityFlag::PathwayShareMissing);
            out.unassigned = mitigable;
        }
    }
    out
}
