//! The per-reach load pipeline: split, distribute, mitigate.

use crate::config::MitigationConfig;
use crate::error::ConfigError;
use crate::mitigation::{apply, assess, remaining_factor, MitigationState};
use crate::pathway::{distribute, PathwayShares};
use crate::splitter::{split_bank_erosion, split_fractions};
use serde::{Deserialize, Serialize};
use tarn_core::{
    CoverageCategory, Fraction, FractionMap, PathwayMap, QualityFlag, QualityFlags, ReachId,
};

/// Everything the pipeline needs to know about one reach in one scenario.
#[derive(Clone, Copy, Debug)]
pub struct ReachInput<'a> {
    /// The reach.
    pub reach: ReachId,
    /// Raw generated load before any filtering.
    pub raw_load: f64,
    /// Wetland coverage, in percent.
    pub coverage_percent: f64,
    /// Soil clay content, in percent.
    pub clay_percent: f64,
    /// Pathway shares, if the reach has them.
    pub shares: Option<&'a PathwayShares>,
    /// Agricultural land share, in percent, if known.
    pub ag_percent: Option<f64>,
    /// Whether the reach is inside the area of interest.
    pub in_scope: bool,
}

/// One fraction's journey through the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FractionBreakdown {
    /// Fraction load before the bank-erosion split.
    pub load: f64,
    /// Bank erosion share, never mitigated.
    pub bank_erosion: f64,
    /// Mitigable share.
    pub mitigable: f64,
    /// Per-pathway mitigation.
    pub pathways: PathwayMap<MitigationState>,
    /// Mitigable load not attributed to a pathway, carried unmitigated.
    pub unassigned: f64,
}

impl FractionBreakdown {
    /// Load leaving the reach with every factor at 1.
    pub fn baseline(&self) -> f64 {
        self.bank_erosion + self.pathways.values().map(|s| s.input).sum::<f64>() + self.unassigned
    }

    /// Load leaving the reach with the applied factors.
    pub fn mitigated(&self) -> f64 {
        self.bank_erosion + self.pathways.values().map(|s| s.mitigated).sum::<f64>() + self.unassigned
    }
}

/// Full mitigation breakdown for one reach in one scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReachLoadBreakdown {
    /// The reach.
    pub reach: ReachId,
    /// Load entering the split, after the agricultural filter.
    pub available_load: f64,
    /// Whether the agricultural filter scaled the load.
    pub ag_filter_applied: bool,
    /// Coverage category used.
    pub category: CoverageCategory,
    /// Whether clay content disabled mitigation.
    pub clay_constrained: bool,
    /// Data-quality observations.
    pub flags: QualityFlags,
    /// Per-fraction detail.
    pub fractions: FractionMap<FractionBreakdown>,
}

impl ReachLoadBreakdown {
    /// Locally generated load with no mitigation.
    pub fn generated_baseline(&self) -> f64 {
        self.fractions.values().map(FractionBreakdown::baseline).sum()
    }

    /// Locally generated load after mitigation.
    pub fn generated_mitigated(&self) -> f64 {
        self.fractions.values().map(FractionBreakdown::mitigated).sum()
    }
}

/// Run one reach through split, distribute, and mitigate.
///
/// Non-finite inputs are not rejected here; they surface as non-finite
/// generated loads, which the accumulator treats as a numeric fault.
pub fn process_reach(
    config: &MitigationConfig,
    input: &ReachInput<'_>,
) -> Result<ReachLoadBreakdown, ConfigError> {
    let mut flags = QualityFlags::empty();
    if !(0.0..=100.0).contains(&input.coverage_percent) {
        flags.insert(QualityFlag::CoverageOutOfRange);
    }
    // NaN fails the range check, so a NaN clay or ag% is flagged too.
    let ag_invalid = input.ag_percent.is_some_and(|ag| !(0.0..=100.0).contains(&ag));
    if !(0.0..=100.0).contains(&input.clay_percent) || ag_invalid {
        flags.insert(QualityFlag::AttributeOutOfRange);
    }

    let (available_load, ag_filter_applied) = match (config.agricultural, input.ag_percent) {
        (Some(filter), Some(ag)) if ag < filter.threshold_percent => {
            (input.raw_load * ag / 100.0, true)
        }
        _ => (input.raw_load, false),
    };
    if input.raw_load < 0.0 || available_load < 0.0 {
        flags.insert(QualityFlag::NegativeLoad);
    }

    let mitigation = assess(
        input.coverage_percent,
        input.clay_percent,
        input.in_scope,
        config,
    );

    let loads = split_fractions(available_load, &config.fraction_ratios);
    let mut fractions = FractionMap::<FractionBreakdown>::default();
    for fraction in Fraction::ALL {
        let bank = split_bank_erosion(loads[fraction], config.bank_erosion_ratio);
        let dist = distribute(
            bank.mitigable,
            fraction,
            input.shares,
            config.pathway_share_tolerance,
        );
        flags = flags.union(&dist.flags);

        let mut pathways = PathwayMap::<MitigationState>::default();
        for (pathway, &load) in dist.loads.iter() {
            let factor = remaining_factor(config, &mitigation, fraction, pathway)?;
            pathways[pathway] = apply(load, factor);
        }

        fractions[fraction] = FractionBreakdown {
            load: loads[fraction],
            bank_erosion: bank.bank_erosion,
            mitigable: bank.mitigable,
            pathways,
            unassigned: dist.unassigned,
        };
    }

    let breakdown = ReachLoadBreakdown {
        reach: input.reach,
        available_load,
        ag_filter_applied,
        category: mitigation.category,
        clay_constrained: mitigation.clay_constrained,
        flags,
        fractions,
    };
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgriculturalFilter;
    use crate::lrf::{LrfEntry, LrfTable};
    use tarn_core::Pathway;

    fn config() -> MitigationConfig {
        let mut entries = Vec::new();
        for (c, v) in [
            (CoverageCategory::Low, 0.48),
            (CoverageCategory::Medium, 0.42),
            (CoverageCategory::High, 0.23),
        ] {
            for f in Fraction::ALL {
                for p in Pathway::ALL {
                    entries.push(LrfEntry {
                        category: c,
                        fraction: f,
                        pathway: p,
                        factor: v,
                    });
                }
            }
        }
        MitigationConfig::with_lrf(LrfTable::from_entries(entries).unwrap())
    }

    fn shares() -> PathwayShares {
        PathwayShares::new(PathwayMap([0.4, 0.2, 0.2, 0.1, 0.1]))
    }

    fn input(raw: f64, coverage: f64, shares: Option<&PathwayShares>) -> ReachInput<'_> {
        ReachInput {
            reach: ReachId(1),
            raw_load: raw,
            coverage_percent: coverage,
            clay_percent: 10.0,
            shares,
            ag_percent: None,
            in_scope: true,
        }
    }

    #[test]
    fn zero_load_gives_exact_zeros() {
        let s = shares();
        let b = process_reach(&config(), &input(0.0, 5.0, Some(&s))).unwrap();
        assert_eq!(b.generated_baseline(), 0.0);
        assert_eq!(b.generated_mitigated(), 0.0);
        assert!(b.flags.is_empty());
    }

    #[test]
    fn no_coverage_leaves_load_unchanged() {
        let s = shares();
        let b = process_reach(&config(), &input(12.0, 0.0, Some(&s))).unwrap();
        assert_eq!(b.category, CoverageCategory::None);
        assert!((b.generated_baseline() - 12.0).abs() < 1e-12);
        assert_eq!(b.generated_baseline(), b.generated_mitigated());
    }

    #[test]
    fn high_coverage_mitigates_only_non_bank_share() {
        // Half of every fraction is bank erosion; the rest keeps 23 %.
        let s = shares();
        let b = process_reach(&config(), &input(10.0, 5.0, Some(&s))).unwrap();
        assert_eq!(b.category, CoverageCategory::High);
        let expected = 5.0 + 5.0 * 0.23;
        assert!((b.generated_mitigated() - expected).abs() < 1e-9);
        assert!((b.generated_baseline() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn particulate_breakdown_is_surface_only() {
        let s = shares();
        let b = process_reach(&config(), &input(10.0, 3.0, Some(&s))).unwrap();
        let part = &b.fractions[Fraction::Particulate];
        assert_eq!(part.pathways[Pathway::SurfaceRunoff].input, 2.5);
        assert_eq!(part.pathways[Pathway::SurfaceRunoff].factor, 0.42);
        for p in &Pathway::ALL[1..] {
            assert_eq!(part.pathways[*p].input, 0.0);
            assert_eq!(part.pathways[*p].factor, 1.0);
        }
    }

    #[test]
    fn missing_shares_conserve_mass_and_flag() {
        let b = process_reach(&config(), &input(10.0, 5.0, None)).unwrap();
        assert!(b.flags.contains(QualityFlag::PathwayShareMissing));
        assert!((b.generated_baseline() - 10.0).abs() < 1e-12);
        // Only particulate is mitigated: 2.5 mitigable × 0.23.
        let expected = 10.0 - 2.5 * (1.0 - 0.23);
        assert!((b.generated_mitigated() - expected).abs() < 1e-9);
    }

    #[test]
    fn negative_and_out_of_range_inputs_flagged() {
        let s = shares();
        let b = process_reach(&config(), &input(-1.0, 150.0, Some(&s))).unwrap();
        assert!(b.flags.contains(QualityFlag::NegativeLoad));
        assert!(b.flags.contains(QualityFlag::CoverageOutOfRange));
        assert!(b.generated_baseline() < 0.0);
    }

    #[test]
    fn ag_filter_scales_low_agriculture_reaches() {
        let mut c = config();
        c.agricultural = Some(AgriculturalFilter::default());
        let s = shares();
        let mut i = input(20.0, 0.0, Some(&s));
        i.ag_percent = Some(10.0);
        let b = process_reach(&c, &i).unwrap();
        assert!(b.ag_filter_applied);
        assert!((b.available_load - 2.0).abs() < 1e-12);

        i.ag_percent = Some(80.0);
        let b = process_reach(&c, &i).unwrap();
        assert!(!b.ag_filter_applied);
        assert_eq!(b.available_load, 20.0);
    }

    #[test]
    fn negative_ag_percent_flags_filtered_load() {
        let mut c = config();
        c.agricultural = Some(AgriculturalFilter::default());
        let s = shares();
        let mut i = input(20.0, 0.0, Some(&s));
        i.ag_percent = Some(-10.0);
        let b = process_reach(&c, &i).unwrap();
        assert!(b.ag_filter_applied);
        assert!((b.available_load + 2.0).abs() < 1e-12);
        assert!(b.flags.contains(QualityFlag::NegativeLoad));
        assert!(b.flags.contains(QualityFlag::AttributeOutOfRange));
    }

    #[test]
    fn non_finite_soil_and_land_use_flagged() {
        let s = shares();
        let mut i = input(10.0, 5.0, Some(&s));
        i.clay_percent = f64::NAN;
        let b = process_reach(&config(), &i).unwrap();
        assert!(b.flags.contains(QualityFlag::AttributeOutOfRange));
        assert!(!b.flags.contains(QualityFlag::NegativeLoad));

        let mut c = config();
        c.agricultural = Some(AgriculturalFilter::default());
        let mut i = input(10.0, 5.0, Some(&s));
        i.ag_percent = Some(f64::NAN);
        let b = process_reach(&c, &i).unwrap();
        assert!(!b.ag_filter_applied);
        assert!(b.flags.contains(QualityFlag::AttributeOutOfRange));
    }

    #[test]
    fn ag_filter_off_by_default() {
        let s = shares();
        let mut i = input(20.0, 0.0, Some(&s));
        i.ag_percent = Some(1.0);
        let b = process_reach(&config(), &i).unwrap();
        assert!(!b.ag_filter_applied);
        assert_eq!(b.available_load, 20.0);
    }

    #[test]
    fn missing_lrf_fails_reach() {
        let c = MitigationConfig::with_lrf(LrfTable::new());
        let s = shares();
        let result = process_reach(&c, &input(1.0, 5.0, Some(&s)));
        assert!(matches!(result, Err(ConfigError::MissingLrf { .. })));
    }

    #[test]
    fn nan_load_surfaces_as_non_finite_generated() {
        let s = shares();
        let b = process_reach(&config(), &input(f64::NAN, 5.0, Some(&s))).unwrap();
        assert!(b.generated_baseline().is_nan());
    }
}
