//! Iterated local-ratio matching on the N-partite conflict hypergraph.
//!
//! Every N-tuple of input nodes is a candidate correspondence (hyperedge);
//! two hyperedges conflict when they coincide or when, in any coordinate
//! graph, one entry can reach the other. The local-ratio reduction peels
//! weight off conflicting neighbourhoods until a low-conflict matching
//! remains.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Instant;

use ahash::{AHashMap, AHashSet};
use dagfuse_graph::{Graph, NodeId};
use itertools::Itertools;
use tracing::debug;

use crate::config::MatchConfig;
use crate::error::AlgorithmError;
use crate::finder::McisFinder;
use crate::tuple::NodeTuple;

const EPSILON: f64 = 1e-9;

/// MCIS as a low-conflict matching over candidate node correspondences.
pub struct Kpt {
    config: MatchConfig,
}

impl Kpt {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    fn kpcm_match(
        &self,
        f: BTreeSet<NodeTuple>,
        w: BTreeMap<NodeTuple, f64>,
        conflicts: &mut ConflictIndex<'_>,
        deadline: Instant,
    ) -> BTreeSet<NodeTuple> {
        if f.is_empty() || Instant::now() >= deadline {
            return BTreeSet::new();
        }

        // Fractional relaxation; a uniform split stands in for the optimal
        // LP solution.
        let total: f64 = f.iter().map(|e| w.get(e).copied().unwrap_or(0.0)).sum();
        if total == 0.0 {
            return BTreeSet::new();
        }
        let x: BTreeMap<&NodeTuple, f64> = f
            .iter()
            .map(|e| (e, w.get(e).copied().unwrap_or(0.0) / total))
            .collect();

        // Drop hyperedges whose fractional value vanished.
        let nonzero: BTreeSet<NodeTuple> = f.iter().filter(|e| x[*e] > EPSILON).cloned().collect();
        if nonzero.len() < f.len() {
            return self.kpcm_match(nonzero, w, conflicts, deadline);
        }

        // Low-conflict selection with alpha = 2N.
        let alpha = 2.0 * conflicts.num_graphs() as f64;
        let mut selected: Option<&NodeTuple> = None;
        for e in &f {
            let conflict_sum: f64 = f
                .iter()
                .filter(|q| conflicts.conflicting(e, q))
                .map(|q| x[q])
                .sum();
            if conflict_sum <= alpha {
                selected = Some(e);
                break;
            }
        }
        // Theory guarantees a low-conflict hyperedge; settle for the first
        // one rather than recursing forever if it is missing.
        let Some(selected) = selected.or_else(|| f.iter().next()).cloned() else {
            return BTreeSet::new();
        };

        // Local-ratio step: peel min(w_f, w_e) off every conflicting edge.
        let w_e = w.get(&selected).copied().unwrap_or(0.0);
        let mut w_next = w;
        for e in &f {
            if conflicts.conflicting(&selected, e) {
                let current = w_next.get(e).copied().unwrap_or(0.0);
                w_next.insert(e.clone(), current - current.min(w_e));
            }
        }

        let m_prime = self.kpcm_match(f, w_next, conflicts, deadline);

        // Greedy augmentation.
        if m_prime
            .iter()
            .any(|member| conflicts.conflicting(&selected, member))
        {
            m_prime
        } else {
            let mut matching = m_prime;
            matching.insert(selected);
            matching
        }
    }
}

impl Default for Kpt {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl McisFinder for Kpt {
    fn find(&self, graphs: &[&Graph]) -> Result<Vec<Graph>, AlgorithmError> {
        if graphs.is_empty() || graphs.iter().any(|g| g.get_num_nodes() == 0) {
            return Err(AlgorithmError::EmptyGraph);
        }

        let id_lists: Vec<Vec<String>> = graphs.iter().map(|g| g.sorted_node_ids()).collect();

        let universe: BTreeSet<NodeTuple> = id_lists
            .iter()
            .map(|ids| ids.iter().cloned())
            .multi_cartesian_product()
            .map(NodeTuple::new)
            .collect();
        let weights: BTreeMap<NodeTuple, f64> =
            universe.iter().map(|e| (e.clone(), 1.0)).collect();
        debug!("matching over {} candidate hyperedges", universe.len());

        let mut conflicts = ConflictIndex::new(graphs);
        let deadline = Instant::now() + self.config.timeout();
        let matching = self.kpcm_match(universe, weights, &mut conflicts, deadline);
        debug!("matching holds {} hyperedges", matching.len());

        let mut result = Graph::new();
        result.reserve_nodes(matching.len());
        for hyperedge in &matching {
            let _ = result.add_node(hyperedge.joined_id());
        }
        Ok(vec![result])
    }
}

/// Conflict and reachability queries against the input graphs, memoized for
/// the duration of one engine invocation.
pub(crate) struct ConflictIndex<'g> {
    graphs: &'g [&'g Graph],
    reach_cache: Vec<AHashMap<(NodeId, NodeId), bool>>,
    conflicts: AHashMap<NodeTuple, AHashMap<NodeTuple, bool>>,
}

impl<'g> ConflictIndex<'g> {
    pub(crate) fn new(graphs: &'g [&'g Graph]) -> Self {
        Self {
            graphs,
            reach_cache: vec![AHashMap::new(); graphs.len()],
            conflicts: AHashMap::new(),
        }
    }

    fn num_graphs(&self) -> usize {
        self.graphs.len()
    }

    /// Two hyperedges conflict when they are equal, or when any coordinate
    /// pair is reachable one way or the other in that coordinate's graph.
    pub(crate) fn conflicting(&mut self, p: &NodeTuple, q: &NodeTuple) -> bool {
        if p == q {
            return true;
        }
        let (a, b) = if p <= q { (p, q) } else { (q, p) };
        if let Some(&cached) = self.conflicts.get(a).and_then(|row| row.get(b)) {
            return cached;
        }
        let mut result = false;
        for i in 0..self.graphs.len() {
            if self.reachable(i, p.get(i), q.get(i)) || self.reachable(i, q.get(i), p.get(i)) {
                result = true;
                break;
            }
        }
        self.conflicts
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), result);
        result
    }

    /// Directed reachability by breadth-first traversal of the children
    /// maps. A node reaches itself; an unknown start reaches nothing.
    fn reachable(&mut self, graph_idx: usize, start: &str, end: &str) -> bool {
        if start == end {
            return true;
        }
        let graph = self.graphs[graph_idx];
        let (Some(start_h), Some(end_h)) = (graph.node_id(start), graph.node_id(end)) else {
            return false;
        };
        if let Some(&cached) = self.reach_cache[graph_idx].get(&(start_h, end_h)) {
            return cached;
        }

        let mut visited: AHashSet<NodeId> = AHashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        visited.insert(start_h);
        queue.push_back(start_h);
        let mut found = false;
        'search: while let Some(current) = queue.pop_front() {
            let Some(node) = graph.node(current) else {
                continue;
            };
            for (child, _) in node.children() {
                if child == end_h {
                    found = true;
                    break 'search;
                }
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        self.reach_cache[graph_idx].insert((start_h, end_h), found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Graph {
        let mut g = Graph::new();
        g.add_node_set(["A", "B", "C"]).unwrap();
        g.add_edge("A", "B", 0).unwrap();
        g.add_edge("B", "C", 0).unwrap();
        g
    }

    #[test]
    fn reachability_follows_children_transitively() {
        let g = chain();
        let graphs = [&g];
        let mut index = ConflictIndex::new(&graphs);
        assert!(index.reachable(0, "A", "C"));
        assert!(index.reachable(0, "A", "A"));
        assert!(!index.reachable(0, "C", "A"));
        assert!(!index.reachable(0, "missing", "A"));
        // Cached answer must match the first computation.
        assert!(index.reachable(0, "A", "C"));
    }

    #[test]
    fn conflicts_require_reachability_in_some_coordinate() {
        let g1 = chain();
        let mut g2 = Graph::new();
        g2.add_node_set(["X", "Y", "Z"]).unwrap();
        let graphs = [&g1, &g2];
        let mut index = ConflictIndex::new(&graphs);

        let ax = NodeTuple::new(vec!["A".into(), "X".into()]);
        let cy = NodeTuple::new(vec!["C".into(), "Y".into()]);
        assert!(index.conflicting(&ax, &cy));
        assert!(index.conflicting(&ax, &ax));

        let mut g3 = Graph::new();
        g3.add_node_set(["A", "B"]).unwrap();
        let mut g4 = Graph::new();
        g4.add_node_set(["X", "Y"]).unwrap();
        let independent = [&g3, &g4];
        let mut index = ConflictIndex::new(&independent);
        let ax = NodeTuple::new(vec!["A".into(), "X".into()]);
        let by = NodeTuple::new(vec!["B".into(), "Y".into()]);
        assert!(!index.conflicting(&ax, &by));
    }
}
