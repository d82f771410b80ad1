//! Per-reach load generation and mitigation for Tarn.
//!
//! Turns one reach's raw phosphorus load into a mitigated breakdown in
//! three pure steps:
//!
//! 1. [`splitter`]: total load into chemical fractions, then each fraction
//!    into a bank-erosion share and a mitigable share.
//! 2. [`pathway`]: mitigable load into transport pathways using the
//!    reach's pathway shares (particulate goes to surface runoff only).
//! 3. [`mitigation`]: coverage category, clay constraint, and the
//!    remaining-load factor applied to each pathway load.
//!
//! [`process_reach`] chains the steps for one reach under a validated
//! [`MitigationConfig`]. Network routing lives in `tarn-engine`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod lrf;
pub mod mitigation;
pub mod pathway;
pub mod reach;
pub mod splitter;

pub use config::{
    AgriculturalFilter, CoverageThresholds, MitigationConfig, DEFAULT_FRACTION_RATIOS,
};
pub use error::ConfigError;
pub use lrf::{LrfEntry, LrfKey, LrfTable};
pub use mitigation::{apply, assess, categorize, remaining_factor, MitigationState, ReachMitigation};
pub use pathway::{distribute, Distribution, PathwayShares};
pub use reach::{process_reach, FractionBreakdown, ReachInput, ReachLoadBreakdown};
pub use splitter::{split_bank_erosion, split_fractions, BankSplit};
