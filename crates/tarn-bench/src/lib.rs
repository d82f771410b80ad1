//! Benchmark profiles for the Tarn load routing engine.
//!
//! - [`reference_profile`]: 10K reaches, 8 scenarios
//! - [`stress_profile`]: 100K reaches, 8 scenarios
//!
//! Both are seeded, so repeated benchmark runs see identical inputs.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use tarn_engine::{
    ReachAttributes, ReachTable, RunnerConfig, RunnerError, ScenarioRunner, ScenarioSpec,
};
use tarn_load::MitigationConfig;
use tarn_network::ReachNetwork;
use tarn_test_utils::{even_shares, random_loads, random_network, standard_config};

/// Shared inputs plus a batch of scenarios.
pub struct BenchProfile {
    /// The network.
    pub network: Arc<ReachNetwork>,
    /// Per-reach attributes with `dry` and `flooded` coverage.
    pub reaches: Arc<ReachTable>,
    /// Mitigation settings.
    pub config: Arc<MitigationConfig>,
    /// Alternating `dry` and `flooded` scenarios.
    pub scenarios: Vec<ScenarioSpec>,
}

impl BenchProfile {
    /// A runner over this profile's shared inputs.
    pub fn runner(&self, worker_count: Option<usize>) -> Result<ScenarioRunner, RunnerError> {
        ScenarioRunner::new(
            Arc::clone(&self.network),
            Arc::clone(&self.reaches),
            Arc::clone(&self.config),
            RunnerConfig {
                worker_count,
                ..RunnerConfig::default()
            },
        )
    }
}

/// Build a profile of `reaches` reaches and `scenarios` scenarios.
///
/// Coverage cycles through every category; one reach in eleven has clay
/// above the default threshold.
pub fn profile(seed: u64, reaches: usize, scenarios: u64) -> BenchProfile {
    let network = random_network(seed, reaches);
    let table: ReachTable = network
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let clay = if i % 11 == 0 { 60.0 } else { 20.0 };
            let coverage = (i % 6) as f64;
            (
                n.id,
                ReachAttributes::new(0.7 + (i % 3) as f64 * 0.1, clay)
                    .with_coverage("dry", coverage)
                    .with_coverage("flooded", coverage + 1.5)
                    .with_shares(even_shares()),
            )
        })
        .collect();
    let specs = (0..scenarios)
        .map(|s| {
            let variant = if s % 2 == 0 { "dry" } else { "flooded" };
            ScenarioSpec::new(format!("scenario-{s}"), variant)
                .with_loads(random_loads(&network, seed.wrapping_add(s)))
        })
        .collect();
    BenchProfile {
        network: Arc::new(network),
        reaches: Arc::new(table),
        config: Arc::new(standard_config()),
        scenarios: specs,
    }
}

/// 10K reaches, 8 scenarios.
pub fn reference_profile(seed: u64) -> BenchProfile {
    profile(seed, 10_000, 8)
}

/// 100K reaches, 8 scenarios.
pub fn stress_profile(seed: u64) -> BenchProfile {
    profile(seed, 100_000, 8)
}
