//! Per-scenario summaries for reporting.

use indexmap::IndexMap;
use serde::Serialize;
use tarn_core::{CoverageCategory, ReachId, ScenarioName};

use crate::result::{LoadColumns, ResultTable};

/// Reaches and generated reduction for one coverage category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CategorySummary {
    /// Number of in-scope reaches in the category.
    pub reaches: usize,
    /// Their total generated reduction.
    pub generated_reduction: f64,
}

/// Totals and counts over one completed scenario.
///
/// Load totals cover in-scope reaches that were not poisoned. Poisoned
/// reaches are counted in `poisoned` and contribute nothing else.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioSummary {
    /// The scenario.
    pub scenario: ScenarioName,
    /// In-scope reaches with load columns.
    pub reaches: usize,
    /// Column sums over those reaches.
    pub totals: LoadColumns,
    /// Routed reduction over generated reduction. `None` when nothing was
    /// mitigated.
    pub amplification: Option<f64>,
    /// Per coverage category, every category listed.
    pub by_category: IndexMap<CoverageCategory, CategorySummary>,
    /// In-scope reaches where clay disabled mitigation.
    pub clay_constrained: usize,
    /// Reaches with at least one quality flag.
    pub flagged: usize,
    /// Reaches without load columns after a numeric fault.
    pub poisoned: usize,
    /// Reaches whose load the agricultural filter scaled.
    pub ag_filtered: usize,
    /// Load delivered at each outlet, in processing order.
    pub outlets: Vec<(ReachId, LoadColumns)>,
    /// In-scope reaches with the largest routed reduction, largest first.
    pub top_reductions: Vec<(ReachId, f64)>,
}

impl ScenarioSummary {
    /// Summarize one scenario, keeping the `top_n` largest reductions.
    ///
    /// Returns `None` if the table has no rows for the scenario.
    pub fn from_table(table: &ResultTable, scenario: &ScenarioName, top_n: usize) -> Option<Self> {
        if !table.status(scenario)?.is_completed() {
            return None;
        }

        let mut summary = Self {
            scenario: scenario.clone(),
            reaches: 0,
            totals: LoadColumns::default(),
            amplification: None,
            by_category: CoverageCategory::ALL
                .into_iter()
                .map(|c| (c, CategorySummary::default()))
                .collect(),
            clay_constrained: 0,
            flagged: 0,
            poisoned: 0,
            ag_filtered: 0,
            outlets: Vec::new(),
            top_reductions: Vec::new(),
        };

        for row in table.rows_for(scenario) {
            if !row.flags.is_empty() {
                summary.flagged += 1;
            }
            if row.ag_filter_applied {
                summary.ag_filtered += 1;
            }
            let Some(loads) = row.loads else {
                summary.poisoned += 1;
                continue;
            };
            if row.terminal == row.reach {
                summary.outlets.push((row.reach, loads));
            }
            if !row.in_scope {
                continue;
            }
            summary.reaches += 1;
            summary.totals = summary.totals.add(&loads);
            if row.clay_constrained {
                summary.clay_constrained += 1;
            }
            let cat = summary.by_category.entry(row.category).or_default();
            cat.reaches += 1;
            cat.generated_reduction += loads.generated_reduction();
            summary.top_reductions.push((row.reach, loads.routed_reduction()));
        }

        let generated = summary.totals.generated_reduction();
        if generated != 0.0 {
            summary.amplification = Some(summary.totals.routed_reduction() / generated);
        }
        summary
            .top_reductions
            .sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        summary.top_reductions.truncate(top_n);
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::fixtures::{cols, row, table};
    use tarn_core::{QualityFlag, QualityFlags};

    #[test]
    fn totals_skip_out_of_scope_and_poisoned() {
        let mut a = row(1, "s");
        a.loads = Some(cols(10.0, 6.0, 10.0, 6.0));
        a.category = CoverageCategory::High;
        a.terminal = ReachId(3);
        let mut b = row(2, "s");
        b.in_scope = false;
        b.loads = Some(cols(5.0, 5.0, 5.0, 5.0));
        b.terminal = ReachId(3);
        let mut c = row(3, "s");
        c.loads = None;
        c.anomaly_origin = Some(ReachId(3));
        c.flags = [QualityFlag::NumericAnomaly].into_iter().collect::<QualityFlags>();

        let t = table("s", vec![a, b, c]);
        let s = ScenarioSummary::from_table(&t, &"s".into(), 10).unwrap();
        assert_eq!(s.reaches, 1);
        assert_eq!(s.totals, cols(10.0, 6.0, 10.0, 6.0));
        assert_eq!(s.poisoned, 1);
        assert_eq!(s.flagged, 1);
        assert_eq!(s.amplification, Some(1.0));
        assert_eq!(s.by_category[&CoverageCategory::High].reaches, 1);
        assert_eq!(s.by_category[&CoverageCategory::Low].reaches, 0);
        assert_eq!(s.by_category.len(), 4);
        assert!(s.outlets.is_empty());
    }

    #[test]
    fn amplification_none_without_reduction() {
        let t = table("s", vec![row(1, "s"), row(2, "s")]);
        let s = ScenarioSummary::from_table(&t, &"s".into(), 1).unwrap();
        assert_eq!(s.amplification, None);
        assert_eq!(s.outlets.len(), 2);
        assert_eq!(s.top_reductions.len(), 1);
    }

    #[test]
    fn top_reductions_sorted_descending() {
        let rows = [(1, 0.5), (2, 3.0), (3, 1.0)]
            .into_iter()
            .map(|(id, red)| {
                let mut r = row(id, "s");
                r.loads = Some(cols(red, 0.0, red, 0.0));
                r
            })
            .collect();
        let t = table("s", rows);
        let s = ScenarioSummary::from_table(&t, &"s".into(), 2).unwrap();
        assert_eq!(s.top_reductions, vec![(ReachId(2), 3.0), (ReachId(3), 1.0)]);
    }

    #[test]
    fn unknown_scenario_has_no_summary() {
        let t = table("s", vec![row(1, "s")]);
        assert!(ScenarioSummary::from_table(&t, &"other".into(), 5).is_none());
    }
}
