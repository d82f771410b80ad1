//! The merged result table.

use indexmap::IndexMap;
use serde::Serialize;
use tarn_core::{CoverageCategory, HydroSeq, QualityFlags, ReachId, ScenarioName};
use tarn_load::ReachLoadBreakdown;

use crate::metrics::ScenarioMetrics;
use crate::scenario::ScenarioFailure;

/// Generated and routed load at one reach, baseline and mitigated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LoadColumns {
    /// Locally generated load, no mitigation.
    pub generated_baseline: f64,
    /// Locally generated load, mitigated.
    pub generated_mitigated: f64,
    /// Routed load, no mitigation anywhere upstream.
    pub routed_baseline: f64,
    /// Routed load, mitigation applied everywhere upstream.
    pub routed_mitigated: f64,
}

impl LoadColumns {
    /// Absolute reduction of generated load.
    pub fn generated_reduction(&self) -> f64 {
        self.generated_baseline - self.generated_mitigated
    }

    /// Absolute reduction of routed load.
    pub fn routed_reduction(&self) -> f64 {
        self.routed_baseline - self.routed_mitigated
    }

    /// Generated reduction as a percentage of baseline. Zero when the
    /// baseline is not positive.
    pub fn generated_reduction_percent(&self) -> f64 {
        percent(self.generated_reduction(), self.generated_baseline)
    }

    /// Routed reduction as a percentage of baseline. Zero when the
    /// baseline is not positive.
    pub fn routed_reduction_percent(&self) -> f64 {
        percent(self.routed_reduction(), self.routed_baseline)
    }

    /// Column-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            generated_baseline: self.generated_baseline + other.generated_baseline,
            generated_mitigated: self.generated_mitigated + other.generated_mitigated,
            routed_baseline: self.routed_baseline + other.routed_baseline,
            routed_mitigated: self.routed_mitigated + other.routed_mitigated,
        }
    }

    /// Column-wise difference, `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            generated_baseline: self.generated_baseline - other.generated_baseline,
            generated_mitigated: self.generated_mitigated - other.generated_mitigated,
            routed_baseline: self.routed_baseline - other.routed_baseline,
            routed_mitigated: self.routed_mitigated - other.routed_mitigated,
        }
    }

    /// Copy rounded to `places` decimal places, for presentation only.
    pub fn rounded(&self, places: u32) -> Self {
        let scale = 10f64.powi(places as i32);
        let r = |v: f64| (v * scale).round() / scale;
        Self {
            generated_baseline: r(self.generated_baseline),
            generated_mitigated: r(self.generated_mitigated),
            routed_baseline: r(self.routed_baseline),
            routed_mitigated: r(self.routed_mitigated),
        }
    }
}

pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// One (reach, scenario) row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultRow {
    /// The reach.
    pub reach: ReachId,
    /// The scenario.
    pub scenario: ScenarioName,
    /// Hydrological sequence of the reach.
    pub hydro_seq: HydroSeq,
    /// Outlet the reach drains to.
    pub terminal: ReachId,
    /// Whether the reach is inside the area of interest.
    pub in_scope: bool,
    /// Coverage percentage used.
    pub coverage_percent: f64,
    /// Coverage category used.
    pub category: CoverageCategory,
    /// Clay content disabled mitigation.
    pub clay_constrained: bool,
    /// The agricultural filter scaled the raw load.
    pub ag_filter_applied: bool,
    /// Raw load as given.
    pub raw_load: f64,
    /// Load after the agricultural filter.
    pub available_load: f64,
    /// Attenuation used for arriving upstream load.
    pub attenuation: f64,
    /// Load columns. `None` when the reach was poisoned.
    pub loads: Option<LoadColumns>,
    /// Reach where a non-finite value first appeared, if poisoned.
    pub anomaly_origin: Option<ReachId>,
    /// Data-quality flags.
    pub flags: QualityFlags,
    /// Per-fraction, per-pathway detail, when retained.
    pub breakdown: Option<Box<ReachLoadBreakdown>>,
}

/// Outcome of one scenario.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioStatus {
    /// All rows were produced.
    Completed {
        /// Timing and counters.
        metrics: ScenarioMetrics,
        /// FNV-1a digest of routed loads in processing order.
        digest: u64,
    },
    /// The scenario aborted; it has no rows.
    Failed(ScenarioFailure),
}

impl ScenarioStatus {
    /// Whether the scenario completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Rows grouped by scenario and keyed by reach, plus one status per
/// scenario.
///
/// Rows of one scenario are in processing order. Scenarios appear in
/// submission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    rows: IndexMap<ScenarioName, IndexMap<ReachId, ResultRow>>,
    statuses: IndexMap<ScenarioName, ScenarioStatus>,
    rejected: Vec<ScenarioFailure>,
}

impl ResultTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a completed scenario's rows.
    pub(crate) fn insert_completed(
        &mut self,
        name: ScenarioName,
        rows: Vec<ResultRow>,
        metrics: ScenarioMetrics,
        digest: u64,
    ) {
        let rows = rows.into_iter().map(|row| (row.reach, row)).collect();
        self.rows.insert(name.clone(), rows);
        self.statuses
            .insert(name, ScenarioStatus::Completed { metrics, digest });
    }

    /// Record a failed scenario.
    pub(crate) fn insert_failed(&mut self, name: ScenarioName, failure: ScenarioFailure) {
        self.statuses.insert(name, ScenarioStatus::Failed(failure));
    }

    /// Record a scenario rejected before it ran, e.g. a repeated name.
    pub(crate) fn reject(&mut self, failure: ScenarioFailure) {
        self.rejected.push(failure);
    }

    /// Scenarios rejected before running, in submission order. They have
    /// no status because their name belongs to an earlier scenario.
    pub fn rejected(&self) -> &[ScenarioFailure] {
        &self.rejected
    }

    /// Row for one (reach, scenario).
    pub fn get(&self, reach: ReachId, scenario: &ScenarioName) -> Option<&ResultRow> {
        self.rows.get(scenario)?.get(&reach)
    }

    /// All rows, scenario by scenario.
    pub fn rows(&self) -> impl Iterator<Item = &ResultRow> + '_ {
        self.rows.values().flat_map(IndexMap::values)
    }

    /// Rows of one scenario in processing order.
    pub fn rows_for<'a>(&'a self, scenario: &'a ScenarioName) -> impl Iterator<Item = &'a ResultRow> + 'a {
        self.rows.get(scenario).into_iter().flat_map(IndexMap::values)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.values().map(IndexMap::len).sum()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.values().all(IndexMap::is_empty)
    }

    /// Scenario names in submission order, completed or not.
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioName> + '_ {
        self.statuses.keys()
    }

    /// Status of one scenario.
    pub fn status(&self, scenario: &ScenarioName) -> Option<&ScenarioStatus> {
        self.statuses.get(scenario)
    }

    /// Names of scenarios that failed, with their failures.
    pub fn failed(&self) -> impl Iterator<Item = (&ScenarioName, &ScenarioFailure)> + '_ {
        self.statuses.iter().filter_map(|(name, s)| match s {
            ScenarioStatus::Failed(f) => Some((name, f)),
            ScenarioStatus::Completed { .. } => None,
        })
    }

    /// Of the `expected` scenarios, those with no rows in the table.
    pub fn absent<'a>(&self, expected: &'a [ScenarioName]) -> Vec<&'a ScenarioName> {
        expected
            .iter()
            .filter(|name| !self.status(name).is_some_and(ScenarioStatus::is_completed))
            .collect()
    }

    /// Whether the table has no rows for some expected scenario.
    pub fn is_partial(&self, expected: &[ScenarioName]) -> bool {
        !self.absent(expected).is_empty()
    }
}
