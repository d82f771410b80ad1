//! Reach-by-reach comparison of two scenarios.

use serde::Serialize;
use tarn_core::{ReachId, ScenarioName};

use crate::result::{percent, LoadColumns, ResultTable};

/// One reach present in both scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// The reach.
    pub reach: ReachId,
    /// Loads in the reference scenario.
    pub reference: LoadColumns,
    /// Loads in the other scenario.
    pub other: LoadColumns,
    /// `other - reference`, column by column.
    pub delta: LoadColumns,
}

impl ComparisonRow {
    /// Delta of each column as a percentage of the reference column.
    /// Columns whose reference value is not positive give zero.
    pub fn percent_change(&self) -> LoadColumns {
        LoadColumns {
            generated_baseline: percent(
                self.delta.generated_baseline,
                self.reference.generated_baseline,
            ),
            generated_mitigated: percent(
                self.delta.generated_mitigated,
                self.reference.generated_mitigated,
            ),
            routed_baseline: percent(self.delta.routed_baseline, self.reference.routed_baseline),
            routed_mitigated: percent(
                self.delta.routed_mitigated,
                self.reference.routed_mitigated,
            ),
        }
    }
}

/// Compare `other` against `reference`, in the reference's row order.
///
/// Reaches missing from either scenario, or poisoned in either, are
/// skipped.
pub fn compare_scenarios(
    table: &ResultTable,
    reference: &ScenarioName,
    other: &ScenarioName,
) -> Vec<ComparisonRow> {
    table
        .rows_for(reference)
        .filter_map(|r| {
            let base = r.loads?;
            let alt = table.get(r.reach, other)?.loads?;
            Some(ComparisonRow {
                reach: r.reach,
                reference: base,
                other: alt,
                delta: alt.sub(&base),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ScenarioMetrics;
    use crate::result::fixtures::{cols, row};

    fn two_scenarios() -> ResultTable {
        let mut table = ResultTable::new();
        let mut a = row(1, "dry");
        a.loads = Some(cols(10.0, 8.0, 10.0, 8.0));
        let b = row(2, "dry");
        table.insert_completed("dry".into(), vec![a, b], ScenarioMetrics::default(), 0);

        let mut a = row(1, "flooded");
        a.loads = Some(cols(10.0, 6.0, 10.0, 6.0));
        table.insert_completed("flooded".into(), vec![a], ScenarioMetrics::default(), 0);
        table
    }

    #[test]
    fn delta_and_percent_relative_to_reference() {
        let table = two_scenarios();
        let rows = compare_scenarios(&table, &"dry".into(), &"flooded".into());
        assert_eq!(rows.len(), 1);
        let r = rows[0];
        assert_eq!(r.reach, ReachId(1));
        assert_eq!(r.delta, cols(0.0, -2.0, 0.0, -2.0));
        assert_eq!(r.percent_change().generated_mitigated, -25.0);
        assert_eq!(r.percent_change().generated_baseline, 0.0);
    }

    #[test]
    fn missing_reaches_and_scenarios_skipped() {
        let table = two_scenarios();
        assert!(compare_scenarios(&table, &"dry".into(), &"absent".into()).is_empty());
        let rows = compare_scenarios(&table, &"flooded".into(), &"dry".into());
        assert_eq!(rows.len(), 1);
    }
}
