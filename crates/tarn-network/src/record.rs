//! Input records describing reach topology.

use serde::{Deserialize, Serialize};
use tarn_core::{HydroSeq, ReachId};

/// One reach with the reaches that drain directly into it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyRecord {
    /// The reach.
    pub id: ReachId,
    /// Its hydrological sequence number.
    pub hydro_seq: HydroSeq,
    /// Reaches draining directly into this one.
    #[serde(default)]
    pub upstream: Vec<ReachId>,
}

impl TopologyRecord {
    /// A record with no upstream reaches.
    pub fn headwater(id: impl Into<ReachId>, hydro_seq: impl Into<HydroSeq>) -> Self {
        Self {
            id: id.into(),
            hydro_seq: hydro_seq.into(),
            upstream: Vec::new(),
        }
    }

    /// Builder-style upstream list.
    pub fn with_upstream(mut self, upstream: impl IntoIterator<Item = ReachId>) -> Self {
        self.upstream.extend(upstream);
        self
    }
}

/// One reach with the reach it drains into, as river network exports
/// usually carry it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownstreamRecord {
    /// The reach.
    pub id: ReachId,
    /// Its hydrological sequence number.
    pub hydro_seq: HydroSeq,
    /// The reach it drains into, or `None` for an outlet.
    pub downstream: Option<ReachId>,
}
