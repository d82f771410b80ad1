//! Per-scenario timing and counters.

use serde::{Deserialize, Serialize};

/// Timing and counters collected during one scenario run.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// Wall-clock time for the whole scenario.
    pub total_us: u64,
    /// Resolving loads, coverage, and attenuation per reach.
    pub load_us: u64,
    /// Split, distribute, and mitigate across all reaches.
    pub reach_pipeline_us: u64,
    /// Baseline and mitigated network accumulation.
    pub accumulate_us: u64,
    /// Building result rows.
    pub merge_us: u64,
    /// Number of reaches processed.
    pub reach_count: usize,
    /// Reaches carrying at least one data-quality flag.
    pub flagged_reaches: usize,
    /// Reaches whose routed load was poisoned by a non-finite value.
    pub poisoned_reaches: usize,
}
