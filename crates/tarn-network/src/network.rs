//! The validated [`ReachNetwork`] arena.

use crate::error::TopologyError;
use crate::record::{DownstreamRecord, TopologyRecord};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tarn_core::{HydroSeq, ReachId};

/// One reach in the arena.
///
/// Links are stored as arena indices, not ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReachNode {
    /// The reach id.
    pub id: ReachId,
    /// Its hydrological sequence number.
    pub hydro_seq: HydroSeq,
    /// Arena indices of the reaches draining directly into this one.
    pub upstream: SmallVec<[usize; 4]>,
    /// Arena index of the reach this one drains into.
    pub downstream: Option<usize>,
}

/// A validated forest of reaches draining toward outlets.
///
/// Immutable after [`build`](Self::build). Every edge goes from a lower to
/// a strictly higher [`HydroSeq`], so [`order`](Self::order) visits each
/// reach after all of its upstream reaches.
#[derive(Clone, Debug)]
pub struct ReachNetwork {
    nodes: Vec<ReachNode>,
    index: IndexMap<ReachId, usize>,
    order: Vec<usize>,
    terminal: Vec<usize>,
}

impl ReachNetwork {
    /// Build and validate a network from upstream-list records.
    ///
    /// Validation runs in one pass over the records and one pass over the
    /// edges. Fails on the first problem found.
    pub fn build(
        records: impl IntoIterator<Item = TopologyRecord>,
    ) -> Result<Self, TopologyError> {
        let records: Vec<TopologyRecord> = records.into_iter().collect();
        if records.is_empty() {
            return Err(TopologyError::EmptyNetwork);
        }

        // 1. Index reaches, rejecting duplicates.
        let mut index = IndexMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            if index.insert(r.id, i).is_some() {
                return Err(TopologyError::DuplicateReach { reach: r.id });
            }
        }

        let mut nodes: Vec<ReachNode> = records
            .iter()
            .map(|r| ReachNode {
                id: r.id,
                hydro_seq: r.hydro_seq,
                upstream: SmallVec::new(),
                downstream: None,
            })
            .collect();

        // 2. Resolve upstream links; each reach gets at most one parent.
        for (down, r) in records.iter().enumerate() {
            for &up_id in &r.upstream {
                if up_id == r.id {
                    return Err(TopologyError::SelfLoop { reach: r.id });
                }
                let up = *index.get(&up_id).ok_or(TopologyError::UnknownUpstream {
                    reach: r.id,
                    upstream: up_id,
                })?;
                match nodes[up].downstream {
                    Some(existing) if existing == down => {
                        return Err(TopologyError::DuplicateEdge {
                            upstream: up_id,
                            downstream: r.id,
                        });
                    }
                    Some(existing) => {
                        return Err(TopologyError::MultipleDownstream {
                            reach: up_id,
                            first: nodes[existing].id,
                            second: r.id,
                        });
                    }
                    None => nodes[up].downstream = Some(down),
                }
                nodes[down].upstream.push(up);
            }
        }

        // 3. Every edge must strictly increase the sequence number.
        for node in &nodes {
            if let Some(down) = node.downstream {
                let target = &nodes[down];
                if node.hydro_seq >= target.hydro_seq {
                    return Err(TopologyError::SequenceOrder {
                        upstream: node.id,
                        upstream_seq: node.hydro_seq,
                        downstream: target.id,
                        downstream_seq: target.hydro_seq,
                    });
                }
            }
        }

        // 4. Processing order: ascending sequence, ties broken by id.
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by_key(|&i| (nodes[i].hydro_seq, nodes[i].id));

        // 5. Terminal outlet per reach, filled downstream-first.
        let mut terminal = vec![0usize; nodes.len()];
        for &i in order.iter().rev() {
            terminal[i] = match nodes[i].downstream {
                Some(d) => terminal[d],
                None => i,
            };
        }

        Ok(Self {
            nodes,
            index,
            order,
            terminal,
        })
    }

    /// Build from records that each name their downstream reach.
    pub fn from_downstream(
        records: impl IntoIterator<Item = DownstreamRecord>,
    ) -> Result<Self, TopologyError> {
        let records: Vec<DownstreamRecord> = records.into_iter().collect();
        let mut upstream: IndexMap<ReachId, TopologyRecord> = IndexMap::new();
        for r in &records {
            if upstream
                .insert(r.id, TopologyRecord::headwater(r.id, r.hydro_seq))
                .is_some()
            {
                return Err(TopologyError::DuplicateReach { reach: r.id });
            }
        }
        for r in &records {
            if let Some(down) = r.downstream {
                let target = upstream
                    .get_mut(&down)
                    .ok_or(TopologyError::UnknownDownstream {
                        reach: r.id,
                        downstream: down,
                    })?;
                target.upstream.push(r.id);
            }
        }
        Self::build(upstream.into_values())
    }

    /// Number of reaches.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; construction rejects empty networks.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the network contains a reach.
    pub fn contains(&self, id: ReachId) -> bool {
        self.index.contains_key(&id)
    }

    /// Arena index of a reach.
    pub fn index_of(&self, id: ReachId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Arena index of a reach, or [`TopologyError::UnknownReach`].
    pub fn require(&self, id: ReachId) -> Result<usize, TopologyError> {
        self.index_of(id)
            .ok_or(TopologyError::UnknownReach { reach: id })
    }

    /// The node at an arena index.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    pub fn node(&self, idx: usize) -> &ReachNode {
        &self.nodes[idx]
    }

    /// All nodes in arena (insertion) order.
    pub fn nodes(&self) -> &[ReachNode] {
        &self.nodes
    }

    /// Arena indices in processing order (upstream before downstream).
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Reach ids in processing order.
    pub fn ids_in_order(&self) -> impl Iterator<Item = ReachId> + '_ {
        self.order.iter().map(|&i| self.nodes[i].id)
    }

    /// Reaches with no downstream link, in processing order.
    pub fn outlets(&self) -> impl Iterator<Item = ReachId> + '_ {
        self.order
            .iter()
            .map(|&i| &self.nodes[i])
            .filter(|n| n.downstream.is_none())
            .map(|n| n.id)
    }

    /// Reaches with no upstream links, in processing order.
    pub fn headwaters(&self) -> impl Iterator<Item = ReachId> + '_ {
        self.order
            .iter()
            .map(|&i| &self.nodes[i])
            .filter(|n| n.upstream.is_empty())
            .map(|n| n.id)
    }

    /// Reaches draining directly into `id`.
    pub fn upstream_of(&self, id: ReachId) -> Result<Vec<ReachId>, TopologyError> {
        let idx = self.require(id)?;
        Ok(self.nodes[idx]
            .upstream
            .iter()
            .map(|&u| self.nodes[u].id)
            .collect())
    }

    /// The reach `id` drains into, if any.
    pub fn downstream_of(&self, id: ReachId) -> Result<Option<ReachId>, TopologyError> {
        let idx = self.require(id)?;
        Ok(self.nodes[idx].downstream.map(|d| self.nodes[d].id))
    }

    /// The outlet that `id` eventually drains to. An outlet is its own
    /// terminal.
    pub fn terminal_of(&self, id: ReachId) -> Result<ReachId, TopologyError> {
        let idx = self.require(id)?;
        Ok(self.nodes[self.terminal[idx]].id)
    }

    /// Terminal outlet by arena index.
    pub fn terminal_index(&self, idx: usize) -> usize {
        self.terminal[idx]
    }

    /// Every reach draining into any of `targets`, including the targets
    /// themselves, in processing order.
    pub fn catchment_of(&self, targets: &[ReachId]) -> Result<Vec<ReachId>, TopologyError> {
        let mut member = vec![false; self.nodes.len()];
        for &t in targets {
            member[self.require(t)?] = true;
        }
        for &i in self.order.iter().rev() {
            if let Some(d) = self.nodes[i].downstream {
                if member[d] {
                    member[i] = true;
                }
            }
        }
        Ok(self
            .order
            .iter()
            .filter(|&&i| member[i])
            .map(|&i| self.nodes[i].id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(id: u64, seq: u64, up: &[u64]) -> TopologyRecord {
        TopologyRecord::headwater(id, seq).with_upstream(up.iter().map(|&u| ReachId(u)))
    }

    /// A -> B -> C, with D also draining into C.
    fn small() -> ReachNetwork {
        ReachNetwork::build([
            rec(3, 30, &[2, 4]),
            rec(1, 10, &[]),
            rec(2, 20, &[1]),
            rec(4, 15, &[]),
        ])
        .unwrap()
    }

    #[test]
    fn order_is_ascending_sequence() {
        let net = small();
        let ids: Vec<u64> = net.ids_in_order().map(|r| r.0).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
    }

    #[test]
    fn outlets_headwaters_and_terminals() {
        let net = small();
        assert_eq!(net.outlets().collect::<Vec<_>>(), vec![ReachId(3)]);
        assert_eq!(
            net.headwaters().collect::<Vec<_>>(),
            vec![ReachId(1), ReachId(4)]
        );
        for id in [1, 2, 3, 4] {
            assert_eq!(net.terminal_of(ReachId(id)).unwrap(), ReachId(3));
        }
        assert_eq!(net.downstream_of(ReachId(1)).unwrap(), Some(ReachId(2)));
        assert_eq!(net.downstream_of(ReachId(3)).unwrap(), None);
    }

    #[test]
    fn upstream_of_lists_direct_contributors() {
        let net = small();
        assert_eq!(
            net.upstream_of(ReachId(3)).unwrap(),
            vec![ReachId(2), ReachId(4)]
        );
        assert!(net.upstream_of(ReachId(1)).unwrap().is_empty());
    }

    #[test]
    fn catchment_includes_targets_and_all_upstream() {
        let net = small();
        assert_eq!(
            net.catchment_of(&[ReachId(2)]).unwrap(),
            vec![ReachId(1), ReachId(2)]
        );
        assert_eq!(net.catchment_of(&[ReachId(3)]).unwrap().len(), 4);
    }

    #[test]
    fn ties_in_sequence_break_by_id() {
        let net = ReachNetwork::build([rec(9, 1, &[]), rec(5, 1, &[])]).unwrap();
        let ids: Vec<u64> = net.ids_in_order().map(|r| r.0).collect();
        assert_eq!(ids, vec![5, 9]);
    }

    #[test]
    fn empty_network_rejected() {
        let result = ReachNetwork::build(Vec::new());
        assert!(matches!(result, Err(TopologyError::EmptyNetwork)));
    }

    #[test]
    fn duplicate_reach_rejected() {
        let result = ReachNetwork::build([rec(1, 1, &[]), rec(1, 2, &[])]);
        match result {
            Err(TopologyError::DuplicateReach { reach }) => assert_eq!(reach, ReachId(1)),
            other => panic!("expected DuplicateReach, got {other:?}"),
        }
    }

    #[test]
    fn unknown_upstream_rejected() {
        let result = ReachNetwork::build([rec(1, 1, &[7])]);
        match result {
            Err(TopologyError::UnknownUpstream { reach, upstream }) => {
                assert_eq!(reach, ReachId(1));
                assert_eq!(upstream, ReachId(7));
            }
            other => panic!("expected UnknownUpstream, got {other:?}"),
        }
    }

    #[test]
    fn self_loop_rejected() {
        let result = ReachNetwork::build([rec(1, 1, &[1])]);
        assert!(matches!(result, Err(TopologyError::SelfLoop { .. })));
    }

    #[test]
    fn duplicate_edge_rejected() {
        let result = ReachNetwork::build([rec(1, 1, &[]), rec(2, 2, &[1, 1])]);
        assert!(matches!(result, Err(TopologyError::DuplicateEdge { .. })));
    }

    #[test]
    fn two_parents_rejected() {
        let result = ReachNetwork::build([rec(1, 1, &[]), rec(2, 2, &[1]), rec(3, 3, &[1])]);
        match result {
            Err(TopologyError::MultipleDownstream {
                reach,
                first,
                second,
            }) => {
                assert_eq!(reach, ReachId(1));
                assert_eq!(first, ReachId(2));
                assert_eq!(second, ReachId(3));
            }
            other => panic!("expected MultipleDownstream, got {other:?}"),
        }
    }

    #[test]
    fn sequence_violation_fails_fast() {
        // B (seq 5) lists A (seq 9) as upstream.
        let result = ReachNetwork::build([rec(1, 9, &[]), rec(2, 5, &[1])]);
        match result {
            Err(TopologyError::SequenceOrder {
                upstream,
                downstream,
                ..
            }) => {
                assert_eq!(upstream, ReachId(1));
                assert_eq!(downstream, ReachId(2));
            }
            other => panic!("expected SequenceOrder, got {other:?}"),
        }
    }

    #[test]
    fn equal_sequence_on_edge_rejected() {
        let result = ReachNetwork::build([rec(1, 4, &[]), rec(2, 4, &[1])]);
        assert!(matches!(result, Err(TopologyError::SequenceOrder { .. })));
    }

    #[test]
    fn cycle_rejected() {
        let result = ReachNetwork::build([rec(1, 1, &[2]), rec(2, 2, &[1])]);
        assert!(matches!(result, Err(TopologyError::SequenceOrder { .. })));
    }

    #[test]
    fn from_downstream_matches_upstream_form() {
        let net = ReachNetwork::from_downstream([
            DownstreamRecord {
                id: ReachId(1),
                hydro_seq: HydroSeq(10),
                downstream: Some(ReachId(2)),
            },
            DownstreamRecord {
                id: ReachId(2),
                hydro_seq: HydroSeq(20),
                downstream: None,
            },
        ])
        .unwrap();
        assert_eq!(net.upstream_of(ReachId(2)).unwrap(), vec![ReachId(1)]);
        assert_eq!(net.outlets().collect::<Vec<_>>(), vec![ReachId(2)]);
    }

    #[test]
    fn from_downstream_unknown_target() {
        let result = ReachNetwork::from_downstream([DownstreamRecord {
            id: ReachId(1),
            hydro_seq: HydroSeq(1),
            downstream: Some(ReachId(99)),
        }]);
        assert!(matches!(
            result,
            Err(TopologyError::UnknownDownstream { .. })
        ));
    }

    #[test]
    fn unknown_reach_query() {
        let net = small();
        assert!(matches!(
            net.terminal_of(ReachId(42)),
            Err(TopologyError::UnknownReach { .. })
        ));
        assert!(net.catchment_of(&[ReachId(42)]).is_err());
    }

    // Random forest: reach i drains into some j > i or is an outlet.
    fn arb_forest() -> impl Strategy<Value = Vec<Option<usize>>> {
        (1usize..60).prop_flat_map(|n| {
            prop::collection::vec((any::<bool>(), any::<u64>()), n).prop_map(move |picks| {
                picks
                    .into_iter()
                    .enumerate()
                    .map(|(i, (outlet, r))| {
                        if outlet || i + 1 == n {
                            None
                        } else {
                            Some(i + 1 + (r as usize) % (n - i - 1))
                        }
                    })
                    .collect()
            })
        })
    }

    proptest! {
        #[test]
        fn order_visits_upstream_first(parents in arb_forest()) {
            let records = parents.iter().enumerate().map(|(i, p)| DownstreamRecord {
                id: ReachId(1000 + i as u64),
                hydro_seq: HydroSeq(i as u64),
                downstream: p.map(|d| ReachId(1000 + d as u64)),
            });
            let net = ReachNetwork::from_downstream(records).unwrap();
            let mut pos = vec![0usize; net.len()];
            for (k, &i) in net.order().iter().enumerate() {
                pos[i] = k;
            }
            for (i, node) in net.nodes().iter().enumerate() {
                if let Some(d) = node.downstream {
                    prop_assert!(pos[i] < pos[d]);
                }
                let t = net.terminal_index(i);
                prop_assert!(net.node(t).downstream.is_none());
            }
            let outlets: Vec<ReachId> = net.outlets().collect();
            prop_assert_eq!(net.catchment_of(&outlets).unwrap().len(), net.len());
        }
    }
}
