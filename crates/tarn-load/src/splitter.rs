//! Fraction and bank-erosion splitting.
//!
//! Both splits compute the last part as a remainder, so the parts always
//! add back to the whole up to one rounding step. Negative and non-finite
//! inputs pass through unchanged; flagging them is the caller's job.

use tarn_core::{Fraction, FractionMap};

/// Split a total load into fraction loads by `ratios`.
pub fn split_fractions(total: f64, ratios: &FractionMap<f64>) -> FractionMap<f64> {
    let particulate = total * ratios[Fraction::Particulate];
    let reactive = total * ratios[Fraction::DissolvedReactive];
    let organic = total - particulate - reactive;
    FractionMap([particulate, reactive, organic])
}

/// A fraction load divided into the part mitigation cannot reach and the
/// part it can.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BankSplit {
    /// Load from stream bank erosion, never mitigated.
    pub bank_erosion: f64,
    /// Load available to pathway distribution and mitigation.
    pub mitigable: f64,
}

/// Split one fraction's load into bank erosion and mitigable parts.
pub fn split_bank_erosion(fraction_load: f64, bank_ratio: f64) -> BankSplit {
    let bank_erosion = fraction_load * bank_ratio;
    BankSplit {
        bank_erosion,
        mitigable: fraction_load - bank_erosion,
    }
}
