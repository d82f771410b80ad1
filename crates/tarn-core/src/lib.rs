//! Core types for the Tarn phosphorus load engine.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by every other Tarn crate: reach identifiers, the
//! chemical fraction and transport pathway enums, fixed-size maps keyed
//! by those enums, data-quality flags, and the numeric fault type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod flags;
pub mod id;
pub mod kind;
pub mod map;

pub use error::NumericError;
pub use flags::{QualityFlag, QualityFlags, QualityFlagsIter};
pub use id::{HydroSeq, ReachId, ScenarioName};
pub use kind::{CoverageCategory, Fraction, Pathway};
pub use map::{FractionMap, PathwayMap};
