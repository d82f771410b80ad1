//! Network accumulation and scenario execution for Tarn.
//!
//! The [`ScenarioRunner`] takes a shared, validated
//! [`ReachNetwork`](tarn_network::ReachNetwork), shared per-reach
//! attributes, and a shared mitigation configuration, and runs any
//! number of [`ScenarioSpec`]s through the same linear pipeline:
//!
//! ```text
//! Load -> Split -> Distribute -> Mitigate -> Accumulate -> Merge
//! ```
//!
//! Scenarios are independent. They may run on a worker pool; results
//! are merged by a single writer into one [`ResultTable`] in submission
//! order, so the table does not depend on the worker count. A failure in
//! one scenario is recorded in the table and never stops the others.
//!
//! [`summary`], [`compare`], and [`audit`](mod@audit) derive report-level views
//! from a finished table.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accumulate;
pub mod audit;
pub mod compare;
pub mod config;
pub mod hash;
pub mod metrics;
pub mod result;
pub mod runner;
pub mod scenario;
pub mod summary;

pub use accumulate::{Accumulation, ReachAccumulator, Routed};
pub use audit::{audit, AuditFinding, AuditKind};
pub use compare::{compare_scenarios, ComparisonRow};
pub use config::{AreaOfInterest, RunnerConfig, RunnerError};
pub use metrics::ScenarioMetrics;
pub use result::{LoadColumns, ResultRow, ResultTable, ScenarioStatus};
pub use runner::{ScenarioOutput, ScenarioRunner};
pub use scenario::{
    ReachAttributes, ReachTable, ScenarioError, ScenarioFailure, ScenarioSpec, ScenarioStage,
};
pub use summary::{CategorySummary, ScenarioSummary};
