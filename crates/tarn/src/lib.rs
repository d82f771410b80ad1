//! Tarn: phosphorus load generation, wetland mitigation, and river network
//! routing.
//!
//! This is the facade crate that re-exports the public API of the Tarn
//! sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use tarn::prelude::*;
//!
//! // A -> B -> C.
//! let network = ReachNetwork::build([
//!     TopologyRecord::headwater(ReachId(1), HydroSeq(1)),
//!     TopologyRecord::headwater(ReachId(2), HydroSeq(2)).with_upstream([ReachId(1)]),
//!     TopologyRecord::headwater(ReachId(3), HydroSeq(3)).with_upstream([ReachId(2)]),
//! ])
//! .unwrap();
//!
//! let reaches: ReachTable = [(ReachId(1), 0.5), (ReachId(2), 0.9), (ReachId(3), 0.8)]
//!     .into_iter()
//!     .map(|(id, attenuation)| {
//!         (id, ReachAttributes::new(attenuation, 10.0).with_coverage("combined", 0.0))
//!     })
//!     .collect();
//!
//! // Zero coverage never looks up a remaining-load factor.
//! let runner = ScenarioRunner::new(
//!     Arc::new(network),
//!     Arc::new(reaches),
//!     Arc::new(MitigationConfig::with_lrf(LrfTable::new())),
//!     RunnerConfig::default(),
//! )
//! .unwrap();
//!
//! let baseline = ScenarioSpec::new("baseline", "combined").with_loads([
//!     (ReachId(1), 10.0),
//!     (ReachId(2), 5.0),
//!     (ReachId(3), 2.0),
//! ]);
//! let table = runner.run(&[baseline]);
//! let outlet = table.get(ReachId(3), &"baseline".into()).unwrap();
//! let routed = outlet.loads.unwrap().routed_baseline;
//! assert!((routed - 13.2).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tarn-core` | IDs, fractions, pathways, categories, quality flags |
//! | [`network`] | `tarn-network` | Reach topology validation and queries |
//! | [`load`] | `tarn-load` | Fraction split, pathway distribution, mitigation |
//! | [`engine`] | `tarn-engine` | Accumulation, scenario runner, result table, reports |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`tarn-core`).
///
/// Identifiers, the [`types::Fraction`] and [`types::Pathway`] keys,
/// [`types::CoverageCategory`], and [`types::QualityFlags`].
pub use tarn_core as types;

/// Reach network topology (`tarn-network`).
///
/// Build a [`network::ReachNetwork`] from upstream-list or downstream
/// records; it validates itself and answers outlet, terminal, and
/// catchment queries.
pub use tarn_network as network;

/// Per-reach load processing (`tarn-load`).
///
/// [`load::MitigationConfig`], the [`load::LrfTable`], and
/// [`load::process_reach`].
pub use tarn_load as load;

/// Accumulation and scenario execution (`tarn-engine`).
///
/// [`engine::ScenarioRunner`] produces an [`engine::ResultTable`];
/// [`engine::ScenarioSummary`], [`engine::compare_scenarios`], and
/// [`engine::audit()`] read it.
pub use tarn_engine as engine;

/// Common imports for typical Tarn usage.
///
/// ```rust
/// use tarn::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tarn_core::{
        CoverageCategory, Fraction, HydroSeq, Pathway, QualityFlag, QualityFlags, ReachId,
        ScenarioName,
    };

    // Network
    pub use tarn_network::{DownstreamRecord, ReachNetwork, TopologyError, TopologyRecord};

    // Load processing
    pub use tarn_load::{ConfigError, LrfEntry, LrfTable, MitigationConfig, PathwayShares};

    // Engine
    pub use tarn_engine::{
        audit, compare_scenarios, AreaOfInterest, ReachAttributes, ReachTable, ResultRow,
        ResultTable, RunnerConfig, ScenarioRunner, ScenarioSpec, ScenarioStatus, ScenarioSummary,
    };
}
