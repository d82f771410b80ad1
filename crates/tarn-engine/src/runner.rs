//! The multi-scenario runner.
//!
//! Each scenario runs the same linear pipeline against shared, read-only
//! inputs and owns all of its intermediate buffers. With more than one
//! worker, scenarios are pulled from a crossbeam job channel by scoped
//! threads and their outputs sent back over a result channel; the calling
//! thread is the only writer to the [`ResultTable`] and merges in
//! submission order.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tarn_core::{QualityFlag, QualityFlags, ReachId, ScenarioName};
use tarn_load::{process_reach, MitigationConfig, ReachInput, ReachLoadBreakdown};
use tarn_network::ReachNetwork;
use tracing::{debug, info, warn};

use crate::accumulate::{ReachAccumulator, Routed};
use crate::config::{RunnerConfig, RunnerError};
use crate::hash::routed_digest;
use crate::metrics::ScenarioMetrics;
use crate::result::{LoadColumns, ResultRow, ResultTable};
use crate::scenario::{ReachTable, ScenarioError, ScenarioFailure, ScenarioSpec, ScenarioStage};

/// Rows and bookkeeping for one completed scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioOutput {
    /// Scenario name.
    pub name: ScenarioName,
    /// One row per reach, in processing order.
    pub rows: Vec<ResultRow>,
    /// Timing and counters.
    pub metrics: ScenarioMetrics,
    /// FNV-1a digest of routed loads.
    pub digest: u64,
}

/// Per-reach values resolved for one scenario, indexed by arena index.
struct Resolved {
    raw: Vec<f64>,
    coverage: Vec<f64>,
    attenuation: Vec<f64>,
    flags: Vec<QualityFlags>,
}

/// Runs scenarios over one shared network.
pub struct ScenarioRunner {
    network: Arc<ReachNetwork>,
    reaches: Arc<ReachTable>,
    config: Arc<MitigationConfig>,
    settings: RunnerConfig,
    /// Reach table position per arena index.
    attributes: Vec<usize>,
    /// Area-of-interest mask per arena index.
    in_scope: Vec<bool>,
}

impl ScenarioRunner {
    /// Validate shared inputs and build a runner.
    ///
    /// Checks mitigation settings (not LRF completeness), resolves the
    /// area of interest, and requires attributes for every network reach.
    pub fn new(
        network: Arc<ReachNetwork>,
        reaches: Arc<ReachTable>,
        config: Arc<MitigationConfig>,
        settings: RunnerConfig,
    ) -> Result<Self, RunnerError> {
        config.validate_settings()?;
        let in_scope = settings.area_of_interest.resolve(&network)?;
        let attributes = network
            .nodes()
            .iter()
            .map(|n| {
                reaches
                    .index_of(n.id)
                    .ok_or(RunnerError::MissingAttributes { reach: n.id })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            network,
            reaches,
            config,
            settings,
            attributes,
            in_scope,
        })
    }

    /// The shared network.
    pub fn network(&self) -> &Arc<ReachNetwork> {
        &self.network
    }

    /// The runner settings.
    pub fn settings(&self) -> &RunnerConfig {
        &self.settings
    }

    /// Run every scenario and merge the results.
    ///
    /// Never fails as a whole: failed scenarios are recorded in the
    /// table. A repeated name is rejected before anything runs and
    /// listed in [`ResultTable::rejected`]; the first scenario with that
    /// name still runs.
    pub fn run(&self, scenarios: &[ScenarioSpec]) -> ResultTable {
        let mut table = ResultTable::new();
        let mut outcomes: Vec<Option<Result<ScenarioOutput, ScenarioFailure>>> =
            (0..scenarios.len()).map(|_| None).collect();

        // 1. Reject repeated names.
        let mut seen = HashSet::new();
        let mut jobs = Vec::with_capacity(scenarios.len());
        for (i, spec) in scenarios.iter().enumerate() {
            if seen.insert(&spec.name) {
                jobs.push(i);
            } else {
                warn!(scenario = %spec.name, "duplicate scenario name rejected");
                table.reject(ScenarioFailure {
                    stage: ScenarioStage::Load,
                    error: ScenarioError::DuplicateName {
                        name: spec.name.clone(),
                    },
                });
            }
        }

        // 2. Execute.
        let workers = self.settings.resolved_worker_count().min(jobs.len());
        info!(
            scenarios = jobs.len(),
            workers,
            reaches = self.network.len(),
            "starting scenario run"
        );
        if workers <= 1 {
            for &i in &jobs {
                outcomes[i] = Some(self.run_one(&scenarios[i]));
            }
        } else {
            self.run_parallel(scenarios, &jobs, workers, &mut outcomes);
        }

        // 3. Merge in submission order.
        for (spec, outcome) in scenarios.iter().zip(outcomes) {
            match outcome {
                Some(Ok(out)) => {
                    table.insert_completed(out.name, out.rows, out.metrics, out.digest);
                }
                Some(Err(failure)) => {
                    warn!(scenario = %spec.name, stage = %failure.stage, error = %failure.error, "scenario failed");
                    table.insert_failed(spec.name.clone(), failure);
                }
                None => {}
            }
        }
        table
    }

    fn run_parallel(
        &self,
        scenarios: &[ScenarioSpec],
        jobs: &[usize],
        workers: usize,
        outcomes: &mut [Option<Result<ScenarioOutput, ScenarioFailure>>],
    ) {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<usize>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        for &i in jobs {
            if job_tx.send(i).is_err() {
                break;
            }
        }
        drop(job_tx);

        std::thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move || {
                    while let Ok(i) = job_rx.recv() {
                        let outcome = self.run_one(&scenarios[i]);
                        if result_tx.send((i, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_tx);
            for (i, outcome) in result_rx.iter() {
                outcomes[i] = Some(outcome);
            }
        });
    }

    /// Run one scenario through every stage.
    pub fn run_one(&self, spec: &ScenarioSpec) -> Result<ScenarioOutput, ScenarioFailure> {
        let start = Instant::now();
        let net = &*self.network;
        let mut metrics = ScenarioMetrics {
            reach_count: net.len(),
            ..ScenarioMetrics::default()
        };
        debug!(scenario = %spec.name, variant = %spec.coverage_variant, "scenario started");

        // Load.
        let t = Instant::now();
        let resolved = self.resolve(spec).map_err(|error| ScenarioFailure {
            stage: ScenarioStage::Load,
            error,
        })?;
        metrics.load_us = t.elapsed().as_micros() as u64;

        // Split, distribute, mitigate.
        let t = Instant::now();
        let mut breakdowns: Vec<ReachLoadBreakdown> = Vec::with_capacity(net.len());
        for (i, node) in net.nodes().iter().enumerate() {
            let attrs = self.reaches.by_index(self.attributes[i]);
            let input = ReachInput {
                reach: node.id,
                raw_load: resolved.raw[i],
                coverage_percent: resolved.coverage[i],
                clay_percent: attrs.clay_percent,
                shares: attrs.pathway_shares.as_ref(),
                ag_percent: attrs.ag_percent,
                in_scope: self.in_scope[i],
            };
            let breakdown =
                process_reach(&self.config, &input).map_err(|source| ScenarioFailure {
                    stage: ScenarioStage::Mitigate,
                    error: ScenarioError::Config {
                        reach: node.id,
                        source,
                    },
                })?;
            breakdowns.push(breakdown);
        }
        metrics.reach_pipeline_us = t.elapsed().as_micros() as u64;

        // Accumulate.
        let t = Instant::now();
        let generated_baseline: Vec<f64> =
            breakdowns.iter().map(|b| b.generated_baseline()).collect();
        let generated_mitigated: Vec<f64> =
            breakdowns.iter().map(|b| b.generated_mitigated()).collect();
        let accumulator = ReachAccumulator::new(net);
        let baseline = accumulator.accumulate(&generated_baseline, &resolved.attenuation);
        let mitigated = accumulator.accumulate(&generated_mitigated, &resolved.attenuation);
        for fault in baseline.faults.iter().chain(&mitigated.faults) {
            warn!(
                scenario = %spec.name,
                reach = %fault.reach,
                quantity = fault.quantity,
                value = fault.value,
                "non-finite load; downstream chain poisoned"
            );
        }
        metrics.accumulate_us = t.elapsed().as_micros() as u64;

        // Merge.
        let t = Instant::now();
        let mut rows = Vec::with_capacity(net.len());
        for &i in net.order() {
            let node = net.node(i);
            let b = &breakdowns[i];
            let (loads, anomaly_origin) = match (baseline.routed[i], mitigated.routed[i]) {
                (Routed::Value(rb), Routed::Value(rm)) => (
                    Some(LoadColumns {
                        generated_baseline: generated_baseline[i],
                        generated_mitigated: generated_mitigated[i],
                        routed_baseline: rb,
                        routed_mitigated: rm,
                    }),
                    None,
                ),
                (Routed::Poisoned { origin }, _) | (_, Routed::Poisoned { origin }) => {
                    (None, Some(origin))
                }
            };
            let mut flags = b.flags.union(&resolved.flags[i]);
            if anomaly_origin.is_some() {
                flags.insert(QualityFlag::NumericAnomaly);
                metrics.poisoned_reaches += 1;
            }
            if !flags.is_empty() {
                metrics.flagged_reaches += 1;
            }
            rows.push(ResultRow {
                reach: node.id,
                scenario: spec.name.clone(),
                hydro_seq: node.hydro_seq,
                terminal: net.node(net.terminal_index(i)).id,
                in_scope: self.in_scope[i],
                coverage_percent: resolved.coverage[i],
                category: b.category,
                clay_constrained: b.clay_constrained,
                ag_filter_applied: b.ag_filter_applied,
                raw_load: resolved.raw[i],
                available_load: b.available_load,
                attenuation: resolved.attenuation[i],
                loads,
                anomaly_origin,
                flags,
                breakdown: self.settings.keep_breakdown.then(|| Box::new(b.clone())),
            });
        }
        let digest = routed_digest(
            net.order()
                .iter()
                .map(|&i| (net.node(i).id, &baseline.routed[i], &mitigated.routed[i])),
        );
        metrics.merge_us = t.elapsed().as_micros() as u64;
        metrics.total_us = start.elapsed().as_micros() as u64;

        if metrics.flagged_reaches > 0 {
            warn!(
                scenario = %spec.name,
                flagged = metrics.flagged_reaches,
                poisoned = metrics.poisoned_reaches,
                "reaches carry data-quality flags"
            );
        }
        debug!(
            scenario = %spec.name,
            load_us = metrics.load_us,
            reach_pipeline_us = metrics.reach_pipeline_us,
            accumulate_us = metrics.accumulate_us,
            merge_us = metrics.merge_us,
            "stage timings"
        );
        info!(
            scenario = %spec.name,
            reaches = metrics.reach_count,
            flagged = metrics.flagged_reaches,
            poisoned = metrics.poisoned_reaches,
            total_us = metrics.total_us,
            digest = format_args!("{digest:016x}"),
            "scenario completed"
        );

        Ok(ScenarioOutput {
            name: spec.name.clone(),
            rows,
            metrics,
            digest,
        })
    }

    /// Resolve raw load, coverage, and attenuation for every reach.
    fn resolve(&self, spec: &ScenarioSpec) -> Result<Resolved, ScenarioError> {
        let net = &*self.network;

        // 1. Every named reach must exist.
        for &reach in spec
            .raw_loads
            .keys()
            .chain(spec.attenuation_override.keys())
        {
            if !net.contains(reach) {
                return Err(ScenarioError::UnknownReach { reach });
            }
        }
        // 2. The coverage variant must exist somewhere.
        if !self.reaches.has_variant(&spec.coverage_variant) {
            return Err(ScenarioError::UnknownCoverageVariant {
                variant: spec.coverage_variant.clone(),
            });
        }
        // 3. Every reach needs a load; report the most upstream one.
        if let Some(reach) = net
            .ids_in_order()
            .find(|id| !spec.raw_loads.contains_key(id))
        {
            return Err(ScenarioError::MissingLoad { reach });
        }

        let n = net.len();
        let mut resolved = Resolved {
            raw: Vec::with_capacity(n),
            coverage: Vec::with_capacity(n),
            attenuation: Vec::with_capacity(n),
            flags: vec![QualityFlags::empty(); n],
        };
        for (i, node) in net.nodes().iter().enumerate() {
            let attrs = self.reaches.by_index(self.attributes[i]);
            let raw = spec.raw_loads.get(&node.id).copied().unwrap_or_default();
            // Reaches without an entry for the variant have no wetland.
            let coverage = attrs
                .coverage
                .get(&spec.coverage_variant)
                .copied()
                .unwrap_or(0.0);
            let attenuation = attenuation_for(spec, node.id, attrs.attenuation);
            if !(attenuation > 0.0 && attenuation <= 1.0) {
                resolved.flags[i].insert(QualityFlag::AttenuationOutOfRange);
            }
            resolved.raw.push(raw);
            resolved.coverage.push(coverage);
            resolved.attenuation.push(attenuation);
        }
        Ok(resolved)
    }
}

fn attenuation_for(spec: &ScenarioSpec, reach: ReachId, shared: f64) -> f64 {
    spec.attenuation_override
        .get(&reach)
        .copied()
        .unwrap_or(shared)
}
