//! Consistency checks over a finished result table.
//!
//! Findings describe rows that are numerically suspicious. They never
//! change the table.

use std::fmt;

use serde::Serialize;
use tarn_core::{ReachId, ScenarioName};

use crate::result::{LoadColumns, ResultTable};

/// Loads below this are reported as negative.
const NEGATIVE_TOLERANCE: f64 = -1e-6;
/// Slack for comparisons between columns.
const COMPARE_TOLERANCE: f64 = 1e-9;

/// What an audit finding is about.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum AuditKind {
    /// A load column is significantly negative.
    NegativeLoad {
        /// Column name.
        column: &'static str,
        /// The value.
        value: f64,
    },
    /// A reduction exceeds 100 % of its baseline.
    ReductionAbovePercent {
        /// `"generated"` or `"routed"`.
        column: &'static str,
        /// The reduction percentage.
        percent: f64,
    },
    /// Mitigated load exceeds baseline.
    MitigatedAboveBaseline {
        /// `"generated"` or `"routed"`.
        column: &'static str,
        /// Baseline load.
        baseline: f64,
        /// Mitigated load.
        mitigated: f64,
    },
    /// Routed reduction is smaller than the reach's own generated
    /// reduction.
    AmplificationViolation {
        /// Generated reduction.
        generated: f64,
        /// Routed reduction.
        routed: f64,
    },
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeLoad { column, value } => write!(f, "negative {column}: {value}"),
            Self::ReductionAbovePercent { column, percent } => {
                write!(f, "{column} reduction of {percent:.2}%")
            }
            Self::MitigatedAboveBaseline {
                column,
                baseline,
                mitigated,
            } => write!(f, "{column} mitigated {mitigated} above baseline {baseline}"),
            Self::AmplificationViolation { generated, routed } => write!(
                f,
                "routed reduction {routed} below generated reduction {generated}"
            ),
        }
    }
}

/// One suspicious row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuditFinding {
    /// The reach.
    pub reach: ReachId,
    /// The scenario.
    pub scenario: ScenarioName,
    /// What was found.
    pub kind: AuditKind,
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reach {} in '{}': {}", self.reach, self.scenario, self.kind)
    }
}

/// Check every row with load columns. Poisoned rows are skipped.
pub fn audit(table: &ResultTable) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    for row in table.rows() {
        let Some(loads) = row.loads else { continue };
        findings.extend(
            check(&loads, row.attenuation)
                .into_iter()
                .map(|kind| AuditFinding {
                    reach: row.reach,
                    scenario: row.scenario.clone(),
                    kind,
                }),
        );
    }
    findings
}

fn check(loads: &LoadColumns, attenuation: f64) -> Vec<AuditKind> {
    let mut out = Vec::new();

    // 1. Negative columns.
    for (column, value) in [
        ("generated baseline", loads.generated_baseline),
        ("generated mitigated", loads.generated_mitigated),
        ("routed baseline", loads.routed_baseline),
        ("routed mitigated", loads.routed_mitigated),
    ] {
        if value < NEGATIVE_TOLERANCE {
            out.push(AuditKind::NegativeLoad { column, value });
        }
    }

    // 2. Reductions beyond the baseline, and mitigation that adds load.
    for (column, baseline, mitigated, percent) in [
        (
            "generated",
            loads.generated_baseline,
            loads.generated_mitigated,
            loads.generated_reduction_percent(),
        ),
        (
            "routed",
            loads.routed_baseline,
            loads.routed_mitigated,
            loads.routed_reduction_percent(),
        ),
    ] {
        if percent > 100.0 + COMPARE_TOLERANCE {
            out.push(AuditKind::ReductionAbovePercent { column, percent });
        }
        if mitigated > baseline + COMPARE_TOLERANCE {
            out.push(AuditKind::MitigatedAboveBaseline {
                column,
                baseline,
                mitigated,
            });
        }
    }

    // 3. Upstream reductions can only add to the local one.
    let generated = loads.generated_reduction();
    let routed = loads.routed_reduction();
    if attenuation >= 0.0 && routed < generated - COMPARE_TOLERANCE {
        out.push(AuditKind::AmplificationViolation { generated, routed });
    }
    out
}
