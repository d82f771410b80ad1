//! Configuration errors for the load pipeline.

use std::error::Error;
use std::fmt;
use tarn_core::{CoverageCategory, Fraction, Pathway};

/// Errors detected while building or validating a
/// [`MitigationConfig`](crate::MitigationConfig) or looking up a factor.
///
/// All are fatal for the scenario that hits them.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// No remaining-load factor for a key the run needs.
    MissingLrf {
        /// Coverage category of the missing key.
        category: CoverageCategory,
        /// Fraction of the missing key.
        fraction: Fraction,
        /// Pathway of the missing key.
        pathway: Pathway,
    },
    /// A remaining-load factor is non-finite or outside `[0, 1]`.
    InvalidLrf {
        /// Coverage category of the entry.
        category: CoverageCategory,
        /// Fraction of the entry.
        fraction: Fraction,
        /// Pathway of the entry.
        pathway: Pathway,
        /// The rejected factor.
        value: f64,
    },
    /// The same key appears twice in an entry list.
    DuplicateLrf {
        /// Coverage category of the repeated key.
        category: CoverageCategory,
        /// Fraction of the repeated key.
        fraction: Fraction,
        /// Pathway of the repeated key.
        pathway: Pathway,
    },
    /// An entry was given for [`CoverageCategory::None`], which is always
    /// the identity.
    UnmitigatedCategoryLrf {
        /// Fraction of the entry.
        fraction: Fraction,
        /// Pathway of the entry.
        pathway: Pathway,
    },
    /// A threshold is non-finite or outside its allowed range.
    InvalidThreshold {
        /// Which threshold.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The medium coverage threshold is above the high threshold.
    ThresholdOrder {
        /// Configured medium threshold.
        medium: f64,
        /// Configured high threshold.
        high: f64,
    },
    /// A ratio is non-finite or outside `[0, 1]`.
    InvalidRatio {
        /// Which ratio.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Fraction split ratios do not sum to 1.
    FractionRatiosSum {
        /// The actual sum.
        sum: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLrf {
                category,
                fraction,
                pathway,
            } => write!(
                f,
                "no remaining-load factor for ({category}, {fraction}, {pathway})"
            ),
            Self::InvalidLrf {
                category,
                fraction,
                pathway,
                value,
            } => write!(
                f,
                "remaining-load factor for ({category}, {fraction}, {pathway}) \
                 must be in [0, 1], got {value}"
            ),
            Self::DuplicateLrf {
                category,
                fraction,
                pathway,
            } => write!(
                f,
                "remaining-load factor for ({category}, {fraction}, {pathway}) given twice"
            ),
            Self::UnmitigatedCategoryLrf { fraction, pathway } => write!(
                f,
                "category None takes no remaining-load factor ({fraction}, {pathway})"
            ),
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} is out of range: {value}")
            }
            Self::ThresholdOrder { medium, high } => write!(
                f,
                "medium coverage threshold {medium} exceeds high threshold {high}"
            ),
            Self::InvalidRatio { name, value } => {
                write!(f, "{name} must be in [0, 1], got {value}")
            }
            Self::FractionRatiosSum { sum } => {
                write!(f, "fraction ratios must sum to 1, got {sum}")
            }
        }
    }
}

impl Error for ConfigError {}
