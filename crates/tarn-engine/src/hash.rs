//! Deterministic digests of routed results.
//!
//! Uses FNV-1a over the bit patterns of routed values in processing
//! order. Not cryptographic; used to check that repeated runs, or runs
//! with different worker counts, produce bit-identical results.

use crate::accumulate::Routed;
use tarn_core::ReachId;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Feed a single byte into an FNV-1a hash state.
#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

/// Feed a u64 (as 8 LE bytes) into an FNV-1a hash state.
#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Feed a routed value. Poisoned reaches fold in a marker and their
/// origin so poisoning is visible in the digest.
#[inline]
fn fnv1a_routed(hash: u64, routed: &Routed) -> u64 {
    match routed {
        Routed::Value(v) => fnv1a_u64(fnv1a_byte(hash, 0), v.to_bits()),
        Routed::Poisoned { origin } => fnv1a_u64(fnv1a_byte(hash, 1), origin.0),
    }
}

/// Digest one scenario's routed loads.
///
/// `rows` yields `(reach, baseline, mitigated)` in processing order. The
/// reach id is folded in so reordering changes the digest.
pub fn routed_digest<'a>(rows: impl IntoIterator<Item = (ReachId, &'a Routed, &'a Routed)>) -> u64 {
    let mut hash = FNV_OFFSET;
    for (reach, baseline, mitigated) in rows {
        hash = fnv1a_u64(hash, reach.0);
        hash = fnv1a_routed(hash, baseline);
        hash = fnv1a_routed(hash, mitigated);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digest_is_offset_basis() {
        assert_eq!(routed_digest(std::iter::empty()), FNV_OFFSET);
    }

    #[test]
    fn identical_inputs_identical_digest() {
        let a = Routed::Value(1.5);
        let b = Routed::Value(1.25);
        let d1 = routed_digest([(ReachId(1), &a, &b)]);
        let d2 = routed_digest([(ReachId(1), &a, &b)]);
        assert_eq!(d1, d2);
    }

    #[test]
    fn digest_sensitive_to_order_and_value() {
        let a = Routed::Value(1.0);
        let b = Routed::Value(2.0);
        let forward = routed_digest([(ReachId(1), &a, &a), (ReachId(2), &b, &b)]);
        let reversed = routed_digest([(ReachId(2), &b, &b), (ReachId(1), &a, &a)]);
        assert_ne!(forward, reversed);

        let c = Routed::Value(1.0 + f64::EPSILON);
        assert_ne!(
            routed_digest([(ReachId(1), &a, &a)]),
            routed_digest([(ReachId(1), &c, &a)])
        );
    }

    #[test]
    fn poisoned_differs_from_value() {
        let v = Routed::Value(0.0);
        let p = Routed::Poisoned { origin: ReachId(0) };
        assert_ne!(
            routed_digest([(ReachId(1), &v, &v)]),
            routed_digest([(ReachId(1), &p, &v)])
        );
    }
}
