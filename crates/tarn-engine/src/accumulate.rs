//! Ordered network accumulation with receiving-reach attenuation.
//!
//! For each reach `r` in ascending hydrological sequence:
//!
//! ```text
//! routed(r) = generated(r) + attenuation(r) × Σ routed(u), u ∈ upstream(r)
//! ```
//!
//! Attenuation belongs to the *receiving* reach: it scales what arrives
//! from upstream, not the reach's own generated load. Headwater reaches
//! route exactly their generated load.
//!
//! A non-finite generated or routed value poisons that reach and every
//! reach downstream of it. Other branches are computed normally.

use serde::{Deserialize, Serialize};
use tarn_core::{NumericError, ReachId};
use tarn_network::ReachNetwork;

/// Routed load at one reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Routed {
    /// A finite routed load.
    Value(f64),
    /// No value: a non-finite load appeared at `origin`, which is this
    /// reach or one upstream of it.
    Poisoned {
        /// Where the non-finite value first appeared.
        origin: ReachId,
    },
}

impl Routed {
    /// The routed load, if not poisoned.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Poisoned { .. } => None,
        }
    }

    /// Whether this reach was poisoned.
    pub fn is_poisoned(&self) -> bool {
        matches!(self, Self::Poisoned { .. })
    }
}

/// Result of one accumulation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulation {
    /// Routed load per reach, indexed by arena index.
    pub routed: Vec<Routed>,
    /// One entry per reach where a non-finite value first appeared.
    pub faults: Vec<NumericError>,
}

/// Accumulates per-reach loads over a validated network.
///
/// Holds only a borrow of the network, so many accumulators (one per
/// scenario) can share one network.
#[derive(Clone, Copy, Debug)]
pub struct ReachAccumulator<'n> {
    network: &'n ReachNetwork,
}

impl<'n> ReachAccumulator<'n> {
    /// An accumulator over `network`.
    pub fn new(network: &'n ReachNetwork) -> Self {
        Self { network }
    }

    /// Route `generated` loads through the network.
    ///
    /// Both slices are indexed by arena index.
    ///
    /// # Panics
    ///
    /// Panics if either slice length differs from the network size.
    pub fn accumulate(&self, generated: &[f64], attenuation: &[f64]) -> Accumulation {
        let n = self.network.len();
        assert_eq!(generated.len(), n, "generated length must match network");
        assert_eq!(attenuation.len(), n, "attenuation length must match network");

        let mut routed = vec![Routed::Value(0.0); n];
        let mut faults = Vec::new();

        for &i in self.network.order() {
            let node = self.network.node(i);

            let mut arriving = 0.0;
            let mut poisoned_by = None;
            for &u in &node.upstream {
                match routed[u] {
                    Routed::Value(v) => arriving += v,
                    Routed::Poisoned { origin } => {
                        poisoned_by.get_or_insert(origin);
                    }
                }
            }
            if let Some(origin) = poisoned_by {
                routed[i] = Routed::Poisoned { origin };
                continue;
            }

            let g = generated[i];
            if !g.is_finite() {
                faults.push(NumericError {
                    reach: node.id,
                    quantity: "generated load",
                    value: g,
                });
                routed[i] = Routed::Poisoned { origin: node.id };
                continue;
            }

            let value = if node.upstream.is_empty() {
                g
            } else {
                g + attenuation[i] * arriving
            };
            if !value.is_finite() {
                faults.push(NumericError {
                    reach: node.id,
                    quantity: "routed load",
                    value,
                });
                routed[i] = Routed::Poisoned { origin: node.id };
                continue;
            }
            routed[i] = Routed::Value(value);
        }

        Accumulation { routed, faults }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tarn_test_utils::{chain_network, random_network, two_basins, CHAIN_A, CHAIN_B, CHAIN_C};

    fn by_id(net: &ReachNetwork, values: &[(ReachId, f64)]) -> Vec<f64> {
        let mut out = vec![0.0; net.len()];
        for &(id, v) in values {
            out[net.index_of(id).unwrap()] = v;
        }
        out
    }

    fn routed_at(net: &ReachNetwork, acc: &Accumulation, id: ReachId) -> Routed {
        acc.routed[net.index_of(id).unwrap()]
    }

    #[test]
    fn chain_fixture_uses_receiving_reach_attenuation() {
        let net = chain_network();
        let g = by_id(&net, &[(CHAIN_A, 10.0), (CHAIN_B, 5.0), (CHAIN_C, 2.0)]);
        // A's attenuation must not be used; set it to something visible.
        let a = by_id(&net, &[(CHAIN_A, 0.1), (CHAIN_B, 0.9), (CHAIN_C, 0.8)]);
        let acc = ReachAccumulator::new(&net).accumulate(&g, &a);
        assert_eq!(routed_at(&net, &acc, CHAIN_A), Routed::Value(10.0));
        let b = routed_at(&net, &acc, CHAIN_B).value().unwrap();
        let c = routed_at(&net, &acc, CHAIN_C).value().unwrap();
        assert!((b - 14.0).abs() < 1e-9, "routed(B) = {b}");
        assert!((c - 13.2).abs() < 1e-9, "routed(C) = {c}");
        assert!(acc.faults.is_empty());
    }

    #[test]
    fn zero_generated_routes_to_exact_zero() {
        let net = chain_network();
        let acc = ReachAccumulator::new(&net).accumulate(&[0.0; 3], &[0.9; 3]);
        assert!(acc.routed.iter().all(|r| *r == Routed::Value(0.0)));
    }

    #[test]
    fn headwater_ignores_non_finite_attenuation() {
        let net = chain_network();
        let g = by_id(&net, &[(CHAIN_A, 1.0)]);
        let a = by_id(&net, &[(CHAIN_A, f64::NAN), (CHAIN_B, 1.0), (CHAIN_C, 1.0)]);
        let acc = ReachAccumulator::new(&net).accumulate(&g, &a);
        assert_eq!(routed_at(&net, &acc, CHAIN_C), Routed::Value(1.0));
    }

    #[test]
    fn nan_poisons_only_its_downstream_chain() {
        let (net, poisoned_head, same_basin, other_basin) = two_basins();
        let mut g = vec![1.0; net.len()];
        g[net.index_of(poisoned_head).unwrap()] = f64::NAN;
        let acc = ReachAccumulator::new(&net).accumulate(&g, &vec![1.0; net.len()]);

        assert_eq!(acc.faults.len(), 1);
        assert_eq!(acc.faults[0].reach, poisoned_head);
        let outlet = net.terminal_of(poisoned_head).unwrap();
        assert_eq!(
            routed_at(&net, &acc, outlet),
            Routed::Poisoned {
                origin: poisoned_head
            }
        );
        // A sibling headwater in the same basin is still finite.
        assert!(routed_at(&net, &acc, same_basin).value().is_some());
        // The other basin is untouched.
        let other_outlet = net.terminal_of(other_basin).unwrap();
        assert!(routed_at(&net, &acc, other_outlet).value().is_some());
    }

    #[test]
    fn overflow_to_infinity_poisons() {
        let net = chain_network();
        let g = by_id(&net, &[(CHAIN_A, f64::MAX), (CHAIN_B, f64::MAX)]);
        let acc = ReachAccumulator::new(&net).accumulate(&g, &[1.0; 3]);
        assert_eq!(
            routed_at(&net, &acc, CHAIN_B),
            Routed::Poisoned { origin: CHAIN_B }
        );
        assert_eq!(acc.faults[0].quantity, "routed load");
        assert!(routed_at(&net, &acc, CHAIN_C).is_poisoned());
    }

    proptest! {
        #[test]
        fn routed_never_below_generated(seed in any::<u64>(), n in 1usize..80) {
            let net = random_network(seed, n);
            let g: Vec<f64> = (0..net.len()).map(|i| (i % 7) as f64 * 0.5).collect();
            let a: Vec<f64> = (0..net.len()).map(|i| 0.5 + (i % 5) as f64 * 0.1).collect();
            let acc = ReachAccumulator::new(&net).accumulate(&g, &a);
            for (i, r) in acc.routed.iter().enumerate() {
                prop_assert!(r.value().unwrap() >= g[i]);
            }
        }

        #[test]
        fn unit_attenuation_conserves_mass_at_outlets(seed in any::<u64>(), n in 1usize..80) {
            let net = random_network(seed, n);
            let g: Vec<f64> = (0..net.len()).map(|i| 1.0 + (i % 3) as f64).collect();
            let acc = ReachAccumulator::new(&net).accumulate(&g, &vec![1.0; net.len()]);
            let total: f64 = g.iter().sum();
            let at_outlets: f64 = net
                .outlets()
                .map(|id| acc.routed[net.index_of(id).unwrap()].value().unwrap())
                .sum();
            prop_assert!((total - at_outlets).abs() <= 1e-9 * total);
        }
    }
}
