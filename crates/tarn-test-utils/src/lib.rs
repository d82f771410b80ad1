//! Test fixtures for Tarn development.
//!
//! Provides small hand-checked networks ([`chain_network`],
//! [`two_basins`]), seeded random drainage forests
//! ([`random_network`]), and a standard mitigation setup
//! ([`standard_config`]) shared by unit tests, integration tests, and
//! benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tarn_core::{CoverageCategory, Fraction, HydroSeq, Pathway, PathwayMap, ReachId};
use tarn_load::{LrfEntry, LrfTable, MitigationConfig, PathwayShares};
use tarn_network::{DownstreamRecord, ReachNetwork, TopologyRecord};

// ── Fixed networks ─────────────────────────────────────────────────

pub const CHAIN_A: ReachId = ReachId(1);
pub const CHAIN_B: ReachId = ReachId(2);
pub const CHAIN_C: ReachId = ReachId(3);

/// `A -> B -> C`, with sequence numbers 1, 2, 3.
pub fn chain_network() -> ReachNetwork {
    ReachNetwork::build([
        TopologyRecord::headwater(CHAIN_A, HydroSeq(1)),
        TopologyRecord::headwater(CHAIN_B, HydroSeq(2)).with_upstream([CHAIN_A]),
        TopologyRecord::headwater(CHAIN_C, HydroSeq(3)).with_upstream([CHAIN_B]),
    ])
    .expect("chain fixture is a valid network")
}

/// Two independent basins.
///
/// Basin one: `1 -> 3`, `2 -> 3`, `3 -> 4`. Basin two: `10 -> 11`.
/// Returns the network, headwater 1, its sibling headwater 2, and
/// headwater 10 of the other basin.
pub fn two_basins() -> (ReachNetwork, ReachId, ReachId, ReachId) {
    let net = ReachNetwork::build([
        TopologyRecord::headwater(1, 1),
        TopologyRecord::headwater(2, 1),
        TopologyRecord::headwater(3, 2).with_upstream([ReachId(1), ReachId(2)]),
        TopologyRecord::headwater(4, 3).with_upstream([ReachId(3)]),
        TopologyRecord::headwater(10, 1),
        TopologyRecord::headwater(11, 2).with_upstream([ReachId(10)]),
    ])
    .expect("two-basin fixture is a valid network");
    (net, ReachId(1), ReachId(2), ReachId(10))
}

// ── Random networks ────────────────────────────────────────────────

/// A seeded random drainage forest of `n` reaches.
///
/// Reach ids run opposite to sequence numbers so that ordering by id
/// and ordering by sequence disagree. Every reach except the last
/// drains into a later reach with probability 0.85; the rest are
/// outlets.
pub fn random_records(seed: u64, n: usize) -> Vec<DownstreamRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let id = |i: usize| ReachId((n - i) as u64);
    (0..n)
        .map(|i| {
            let downstream = if i + 1 < n && rng.random_bool(0.85) {
                Some(id(rng.random_range(i + 1..n)))
            } else {
                None
            };
            DownstreamRecord {
                id: id(i),
                hydro_seq: HydroSeq(i as u64 + 1),
                downstream,
            }
        })
        .collect()
}

/// Build [`random_records`] into a network. `n` must be at least 1.
pub fn random_network(seed: u64, n: usize) -> ReachNetwork {
    ReachNetwork::from_downstream(random_records(seed, n))
        .expect("random records always form a valid forest")
}

/// Seeded raw loads in `[0, 50)` for every reach of `network`.
pub fn random_loads(network: &ReachNetwork, seed: u64) -> Vec<(ReachId, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    network
        .ids_in_order()
        .map(|id| (id, rng.random_range(0.0..50.0)))
        .collect()
}

// ── Mitigation setup ───────────────────────────────────────────────

/// Remaining-load factors per category, the same for every fraction
/// and pathway.
pub const STANDARD_FACTORS: [(CoverageCategory, f64); 3] = [
    (CoverageCategory::Low, 0.48),
    (CoverageCategory::Medium, 0.42),
    (CoverageCategory::High, 0.23),
];

/// A complete LRF table built from [`STANDARD_FACTORS`].
pub fn standard_lrf() -> LrfTable {
    let entries = STANDARD_FACTORS.into_iter().flat_map(|(category, factor)| {
        Fraction::ALL.into_iter().flat_map(move |fraction| {
            Pathway::ALL.into_iter().map(move |pathway| LrfEntry {
                category,
                fraction,
                pathway,
                factor,
            })
        })
    });
    LrfTable::from_entries(entries).expect("standard factors are valid")
}

/// Default settings around [`standard_lrf`]. Passes full validation.
pub fn standard_config() -> MitigationConfig {
    MitigationConfig::with_lrf(standard_lrf())
}

/// Pathway shares `[0.4, 0.2, 0.2, 0.1, 0.1]` in `Pathway::ALL` order.
pub fn even_shares() -> PathwayShares {
    PathwayShares::new(PathwayMap([0.4, 0.2, 0.2, 0.1, 0.1]))
}
