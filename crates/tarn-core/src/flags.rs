//! Data-quality flags and the [`QualityFlags`] bitset.
//!
//! Flags are non-fatal: the value they describe is still used as given.
//! They travel with each result row so report writers can surface them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single non-fatal data-quality observation about a reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum QualityFlag {
    /// A raw or derived load was negative.
    NegativeLoad = 0,
    /// Pathway shares sum to something outside the tolerance around 1.0.
    PathwayShareSum = 1,
    /// The reach has no pathway share table; dissolved load is unassigned.
    PathwayShareMissing = 2,
    /// Coverage percentage was below 0 or above 100.
    CoverageOutOfRange = 3,
    /// Attenuation factor was outside `(0, 1]`.
    AttenuationOutOfRange = 4,
    /// A non-finite value was produced for this reach or an upstream one.
    NumericAnomaly = 5,
    /// Clay or agricultural percentage was non-finite or outside `[0, 100]`.
    AttributeOutOfRange = 6,
}

impl QualityFlag {
    /// Every flag, in bit order.
    pub const ALL: [QualityFlag; 7] = [
        QualityFlag::NegativeLoad,
        QualityFlag::PathwayShareSum,
        QualityFlag::PathwayShareMissing,
        QualityFlag::CoverageOutOfRange,
        QualityFlag::AttenuationOutOfRange,
        QualityFlag::NumericAnomaly,
        QualityFlag::AttributeOutOfRange,
    ];

    const fn bit(self) -> u16 {
        1u16 << (self as u8)
    }

    /// Stable machine-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NegativeLoad => "negative_load",
            Self::PathwayShareSum => "pathway_share_sum",
            Self::PathwayShareMissing => "pathway_share_missing",
            Self::CoverageOutOfRange => "coverage_out_of_range",
            Self::AttenuationOutOfRange => "attenuation_out_of_range",
            Self::NumericAnomaly => "numeric_anomaly",
            Self::AttributeOutOfRange => "attribute_out_of_range",
        }
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of [`QualityFlag`]s attached to one reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityFlags {
    bits: u16,
}

impl QualityFlags {
    /// Create an empty flag set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Insert a flag.
    pub fn insert(&mut self, flag: QualityFlag) {
        self.bits |= flag.bit();
    }

    /// Check whether a flag is set.
    pub fn contains(&self, flag: QualityFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Return the union of two sets (`self | other`).
    pub fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Whether no flag is set.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of flags set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate over set flags in bit order.
    pub fn iter(&self) -> QualityFlagsIter {
        QualityFlagsIter {
            bits: self.bits,
            next: 0,
        }
    }
}

impl fmt::Display for QualityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, flag) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{flag}")?;
        }
        Ok(())
    }
}

impl FromIterator<QualityFlag> for QualityFlags {
    fn from_iter<I: IntoIterator<Item = QualityFlag>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl IntoIterator for QualityFlags {
    type Item = QualityFlag;
    type IntoIter = QualityFlagsIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the flags in a [`QualityFlags`], in bit order.
pub struct QualityFlagsIter {
    bits: u16,
    next: usize,
}

impl Iterator for QualityFlagsIter {
    type Item = QualityFlag;

    fn next(&mut self) -> Option<QualityFlag> {
        while self.next < QualityFlag::ALL.len() {
            let flag = QualityFlag::ALL[self.next];
            self.next += 1;
            if self.bits & flag.bit() != 0 {
                return Some(flag);
            }
        }
        None
    }
}
