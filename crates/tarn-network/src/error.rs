//! Error types for network construction and lookup.

use std::fmt;
use tarn_core::{HydroSeq, ReachId};

/// Errors arising from network construction or reach queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// Attempted to build a network with no reaches.
    EmptyNetwork,
    /// The same reach id appeared in two records.
    DuplicateReach {
        /// The repeated id.
        reach: ReachId,
    },
    /// A record lists an upstream reach that is not in the network.
    UnknownUpstream {
        /// The reach whose record names the missing upstream.
        reach: ReachId,
        /// The missing upstream id.
        upstream: ReachId,
    },
    /// A record names a downstream reach that is not in the network.
    UnknownDownstream {
        /// The reach whose record names the missing downstream.
        reach: ReachId,
        /// The missing downstream id.
        downstream: ReachId,
    },
    /// A reach lists itself as upstream.
    SelfLoop {
        /// The offending reach.
        reach: ReachId,
    },
    /// The same upstream link is listed twice for one reach.
    DuplicateEdge {
        /// Upstream end of the repeated link.
        upstream: ReachId,
        /// Downstream end of the repeated link.
        downstream: ReachId,
    },
    /// A reach drains into more than one downstream reach.
    MultipleDownstream {
        /// The reach with two parents.
        reach: ReachId,
        /// The first downstream reach seen.
        first: ReachId,
        /// The second downstream reach seen.
        second: ReachId,
    },
    /// An edge does not go from a lower to a strictly higher sequence
    /// number. Cycles always produce at least one such edge.
    SequenceOrder {
        /// Upstream end of the edge.
        upstream: ReachId,
        /// Sequence number of the upstream end.
        upstream_seq: HydroSeq,
        /// Downstream end of the edge.
        downstream: ReachId,
        /// Sequence number of the downstream end.
        downstream_seq: HydroSeq,
    },
    /// A query named a reach that is not in the network.
    UnknownReach {
        /// The missing id.
        reach: ReachId,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNetwork => write!(f, "network must have at least one reach"),
            Self::DuplicateReach { reach } => write!(f, "reach {reach} appears more than once"),
            Self::UnknownUpstream { reach, upstream } => {
                write!(f, "reach {reach} lists unknown upstream reach {upstream}")
            }
            Self::UnknownDownstream { reach, downstream } => {
                write!(f, "reach {reach} drains to unknown reach {downstream}")
            }
            Self::SelfLoop { reach } => write!(f, "reach {reach} lists itself as upstream"),
            Self::DuplicateEdge {
                upstream,
                downstream,
            } => write!(f, "link {upstream} -> {downstream} listed more than once"),
            Self::MultipleDownstream {
                reach,
                first,
                second,
            } => write!(
                f,
                "reach {reach} drains to both {first} and {second}"
            ),
            Self::SequenceOrder {
                upstream,
                upstream_seq,
                downstream,
                downstream_seq,
            } => write!(
                f,
                "link {upstream} (seq {upstream_seq}) -> {downstream} (seq {downstream_seq}) \
                 does not increase hydrological sequence"
            ),
            Self::UnknownReach { reach } => write!(f, "reach {reach} is not in the network"),
        }
    }
}

impl std::error::Error for TopologyError {}
