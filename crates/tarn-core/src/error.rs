//! Numeric fault type shared by the load pipeline and the accumulator.

use crate::id::ReachId;
use std::error::Error;
use std::fmt;

/// A non-finite value was produced while processing a reach.
///
/// Fatal for the reach it names and for every reach downstream of it.
/// Other branches of the network are unaffected.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericError {
    /// The reach whose value went non-finite.
    pub reach: ReachId,
    /// Which quantity was being computed (e.g. `"routed load"`).
    pub quantity: &'static str,
    /// The offending value.
    pub value: f64,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "non-finite {} at reach {}: {}",
            self.quantity, self.reach, self.value
        )
    }
}

impl Error for NumericError {}
