//! Chemical fractions, transport pathways, and coverage categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chemical fraction of a phosphorus load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Fraction {
    /// Particulate phosphorus (`PartP`).
    Particulate,
    /// Dissolved reactive phosphorus (`DRP`).
    DissolvedReactive,
    /// Dissolved organic phosphorus (`DOP`).
    DissolvedOrganic,
}

impl Fraction {
    /// Every fraction, in storage order.
    pub const ALL: [Fraction; 3] = [
        Fraction::Particulate,
        Fraction::DissolvedReactive,
        Fraction::DissolvedOrganic,
    ];

    /// Storage index of this fraction in a [`FractionMap`](crate::FractionMap).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short label used in tables and reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Particulate => "PartP",
            Self::DissolvedReactive => "DRP",
            Self::DissolvedOrganic => "DOP",
        }
    }

    /// Whether the fraction travels only by surface runoff.
    pub const fn is_surface_only(self) -> bool {
        matches!(self, Self::Particulate)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hydrological transport pathway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pathway {
    /// Overland flow (`SR`).
    SurfaceRunoff,
    /// Artificial subsurface drainage (`TD`).
    TileDrain,
    /// Lateral flow through the soil profile (`IF`).
    Interflow,
    /// Shallow groundwater (`SG`).
    ShallowGroundwater,
    /// Deep groundwater (`DG`).
    DeepGroundwater,
}

impl Pathway {
    /// Every pathway, in storage order.
    pub const ALL: [Pathway; 5] = [
        Pathway::SurfaceRunoff,
        Pathway::TileDrain,
        Pathway::Interflow,
        Pathway::ShallowGroundwater,
        Pathway::DeepGroundwater,
    ];

    /// Storage index of this pathway in a [`PathwayMap`](crate::PathwayMap).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short label used in tables and reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SurfaceRunoff => "SR",
            Self::TileDrain => "TD",
            Self::Interflow => "IF",
            Self::ShallowGroundwater => "SG",
            Self::DeepGroundwater => "DG",
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discrete bucket of wetland coverage.
///
/// Ordered so that `None < Low < Medium < High`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CoverageCategory {
    /// No coverage; loads pass through unchanged.
    #[default]
    None,
    /// Some coverage below the medium threshold.
    Low,
    /// Coverage at or above the medium threshold.
    Medium,
    /// Coverage at or above the high threshold.
    High,
}

impl CoverageCategory {
    /// Every category, lowest first.
    pub const ALL: [CoverageCategory; 4] = [
        CoverageCategory::None,
        CoverageCategory::Low,
        CoverageCategory::Medium,
        CoverageCategory::High,
    ];

    /// Categories that carry remaining-load factors.
    pub const MITIGATING: [CoverageCategory; 3] = [
        CoverageCategory::Low,
        CoverageCategory::Medium,
        CoverageCategory::High,
    ];

    /// Short label used in tables and reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for CoverageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
