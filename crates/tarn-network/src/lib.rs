//! River reach network topology for Tarn.
//!
//! A [`ReachNetwork`] is an arena of reaches with upstream index lists, a
//! single downstream link per reach, and a precomputed processing order
//! (ascending hydrological sequence). Construction validates the topology
//! once, so every later traversal can assume a forest of trees draining
//! toward outlets with upstream reaches always visited first.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod network;
pub mod record;

pub use error::TopologyError;
pub use network::{ReachNetwork, ReachNode};
pub use record::{DownstreamRecord, TopologyRecord};
