//! The remaining-load factor (LRF) table.
//!
//! An LRF is the fraction of a pathway's load that *remains* after
//! mitigation: `mitigated = load × factor`. A factor of 1.0 means no
//! effect, 0.0 means complete removal. [`CoverageCategory::None`] never
//! appears in the table; it is always the identity.

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tarn_core::{CoverageCategory, Fraction, Pathway, PathwayMap};

/// Lookup key for one factor.
pub type LrfKey = (CoverageCategory, Fraction, Pathway);

/// One row of an LRF table as it appears in serialized configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LrfEntry {
    /// Coverage category (`Low`, `Medium`, or `High`).
    pub category: CoverageCategory,
    /// Chemical fraction.
    pub fraction: Fraction,
    /// Transport pathway.
    pub pathway: Pathway,
    /// Remaining-load factor in `[0, 1]`.
    pub factor: f64,
}

/// Validated table of remaining-load factors.
///
/// Every stored value is finite and in `[0, 1]`. Whether the table covers
/// every key a run needs is checked separately by
/// [`validate_complete`](Self::validate_complete), since that depends on
/// which pathways are eligible for mitigation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LrfEntry>", into = "Vec<LrfEntry>")]
pub struct LrfTable {
    factors: IndexMap<LrfKey, f64>,
}

impl LrfTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries, rejecting invalid values and repeated keys.
    pub fn from_entries(entries: impl IntoIterator<Item = LrfEntry>) -> Result<Self, ConfigError> {
        let mut table = Self::new();
        for e in entries {
            if table.factors.contains_key(&(e.category, e.fraction, e.pathway)) {
                return Err(ConfigError::DuplicateLrf {
                    category: e.category,
                    fraction: e.fraction,
                    pathway: e.pathway,
                });
            }
            table.insert(e.category, e.fraction, e.pathway, e.factor)?;
        }
        Ok(table)
    }

    /// Insert or replace one factor.
    pub fn insert(
        &mut self,
        category: CoverageCategory,
        fraction: Fraction,
        pathway: Pathway,
        factor: f64,
    ) -> Result<(), ConfigError> {
        if category == CoverageCategory::None {
            return Err(ConfigError::UnmitigatedCategoryLrf { fraction, pathway });
        }
        if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
            return Err(ConfigError::InvalidLrf {
                category,
                fraction,
                pathway,
                value: factor,
            });
        }
        self.factors.insert((category, fraction, pathway), factor);
        Ok(())
    }

    /// Look up a factor.
    ///
    /// [`CoverageCategory::None`] returns 1.0 without a lookup. A missing
    /// key for any other category is a [`ConfigError::MissingLrf`].
    pub fn factor(
        &self,
        category: CoverageCategory,
        fraction: Fraction,
        pathway: Pathway,
    ) -> Result<f64, ConfigError> {
        if category == CoverageCategory::None {
            return Ok(1.0);
        }
        self.factors
            .get(&(category, fraction, pathway))
            .copied()
            .ok_or(ConfigError::MissingLrf {
                category,
                fraction,
                pathway,
            })
    }

    /// Keys a run will look up, given which pathways are eligible.
    ///
    /// Surface-only fractions need only their surface-runoff key; their
    /// other pathways always carry zero load and are never looked up.
    pub fn required_keys(eligible: &PathwayMap<bool>) -> impl Iterator<Item = LrfKey> + '_ {
        CoverageCategory::MITIGATING.into_iter().flat_map(move |c| {
            Fraction::ALL.into_iter().flat_map(move |f| {
                Pathway::ALL
                    .into_iter()
                    .filter(move |&p| eligible[p])
                    .filter(move |&p| !f.is_surface_only() || p == Pathway::SurfaceRunoff)
                    .map(move |p| (c, f, p))
            })
        })
    }

    /// Check that every key in [`required_keys`](Self::required_keys) is
    /// present. Reports the first missing key.
    pub fn validate_complete(&self, eligible: &PathwayMap<bool>) -> Result<(), ConfigError> {
        for (category, fraction, pathway) in Self::required_keys(eligible) {
            self.factor(category, fraction, pathway)?;
        }
        Ok(())
    }

    /// Number of stored factors.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Stored entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = LrfEntry> + '_ {
        self.factors
            .iter()
            .map(|(&(category, fraction, pathway), &factor)| LrfEntry {
                category,
                fraction,
                pathway,
                factor,
            })
    }
}

impl TryFrom<Vec<LrfEntry>> for LrfTable {
    type Error = ConfigError;

    fn try_from(entries: Vec<LrfEntry>) -> Result<Self, ConfigError> {
        Self::from_entries(entries)
    }
}

impl From<LrfTable> for Vec<LrfEntry> {
    fn from(table: LrfTable) -> Self {
        table.entries().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(factor: f64) -> LrfTable {
        let entries = CoverageCategory::MITIGATING.into_iter().flat_map(|c| {
            Fraction::ALL.into_iter().flat_map(move |f| {
                Pathway::ALL.into_iter().map(move |p| LrfEntry {
                    category: c,
                    fraction: f,
                    pathway: p,
                    factor,
                })
            })
        });
        LrfTable::from_entries(entries).unwrap()
    }

    #[test]
    fn none_category_is_identity() {
        let table = LrfTable::new();
        let f = table
            .factor(
                CoverageCategory::None,
                Fraction::DissolvedReactive,
                Pathway::TileDrain,
            )
            .unwrap();
        assert_eq!(f, 1.0);
    }

    #[test]
    fn missing_key_is_identified() {
        let table = LrfTable::new();
        match table.factor(
            CoverageCategory::High,
            Fraction::DissolvedOrganic,
            Pathway::Interflow,
        ) {
            Err(ConfigError::MissingLrf {
                category,
                fraction,
                pathway,
            }) => {
                assert_eq!(category, CoverageCategory::High);
                assert_eq!(fraction, Fraction::DissolvedOrganic);
                assert_eq!(pathway, Pathway::Interflow);
            }
            other => panic!("expected MissingLrf, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_factor_rejected() {
        let mut table = LrfTable::new();
        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let result = table.insert(
                CoverageCategory::Low,
                Fraction::Particulate,
                Pathway::SurfaceRunoff,
                bad,
            );
            assert!(matches!(result, Err(ConfigError::InvalidLrf { .. })));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn none_category_entry_rejected() {
        let result = LrfTable::from_entries([LrfEntry {
            category: CoverageCategory::None,
            fraction: Fraction::Particulate,
            pathway: Pathway::SurfaceRunoff,
            factor: 0.5,
        }]);
        assert!(matches!(
            result,
            Err(ConfigError::UnmitigatedCategoryLrf { .. })
        ));
    }

    #[test]
    fn duplicate_entry_rejected() {
        let e = LrfEntry {
            category: CoverageCategory::Low,
            fraction: Fraction::Particulate,
            pathway: Pathway::SurfaceRunoff,
            factor: 0.5,
        };
        let result = LrfTable::from_entries([e, e]);
        assert!(matches!(result, Err(ConfigError::DuplicateLrf { .. })));
    }

    #[test]
    fn complete_table_validates() {
        full(0.5).validate_complete(&PathwayMap::splat(true)).unwrap();
    }

    #[test]
    fn surface_only_fraction_needs_only_surface_key() {
        let keys: Vec<LrfKey> = LrfTable::required_keys(&PathwayMap::splat(true)).collect();
        // 3 categories × (1 particulate + 2 dissolved × 5 pathways)
        assert_eq!(keys.len(), 3 * 11);
        assert!(!keys.contains(&(
            CoverageCategory::Low,
            Fraction::Particulate,
            Pathway::TileDrain
        )));
    }

    #[test]
    fn ineligible_pathways_not_required() {
        let mut eligible = PathwayMap::splat(true);
        eligible[Pathway::DeepGroundwater] = false;
        let keys: Vec<LrfKey> = LrfTable::required_keys(&eligible).collect();
        assert!(keys.iter().all(|k| k.2 != Pathway::DeepGroundwater));
    }

    #[test]
    fn incomplete_table_reports_first_missing_key() {
        let mut table = full(0.4);
        table
            .factors
            .shift_remove(&(CoverageCategory::Medium, Fraction::DissolvedReactive, Pathway::Interflow));
        match table.validate_complete(&PathwayMap::splat(true)) {
            Err(ConfigError::MissingLrf {
                category,
                fraction,
                pathway,
            }) => {
                assert_eq!(
                    (category, fraction, pathway),
                    (
                        CoverageCategory::Medium,
                        Fraction::DissolvedReactive,
                        Pathway::Interflow
                    )
                );
            }
            other => panic!("expected MissingLrf, got {other:?}"),
        }
    }

    #[test]
    fn json_round_trip_goes_through_entries() {
        let table = full(0.23);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with('['));
        let back: LrfTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn json_with_bad_factor_fails_to_load() {
        let json = r#"[{"category":"High","fraction":"Particulate","pathway":"SurfaceRunoff","factor":2.0}]"#;
        assert!(serde_json::from_str::<LrfTable>(json).is_err());
    }
}
