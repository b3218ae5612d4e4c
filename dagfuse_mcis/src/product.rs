//! N-wise tensor product of the input graphs.

use std::collections::{BTreeMap, BTreeSet};

use ahash::{AHashMap, AHashSet};
use dagfuse_graph::Graph;
use itertools::Itertools;
use tracing::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::tuple::NodeTuple;

/// Product graph over N inputs: one vertex per node-id tuple, adjacency by
/// the all-coordinates-agree rule.
///
/// Ordered containers keep iteration lexicographic over the tuples, which is
/// the documented result ordering of the engines built on top.
#[derive(Debug, Clone, Default)]
pub struct ProductGraph {
    nodes: BTreeSet<NodeTuple>,
    adjacency: BTreeMap<NodeTuple, BTreeSet<NodeTuple>>,
}

impl ProductGraph {
    /// Enumerates the Cartesian product of the inputs' node ids and connects
    /// every pair of tuples on which all coordinate graphs agree about
    /// (undirected) edge existence.
    pub fn build(graphs: &[&Graph]) -> Self {
        let id_lists: Vec<Vec<String>> = graphs.iter().map(|g| g.sorted_node_ids()).collect();

        // Edge snapshots keyed by position in the sorted id lists, so the
        // pair scan touches only plain lookups.
        let edge_sets: Vec<AHashSet<(usize, usize)>> = graphs
            .iter()
            .zip(&id_lists)
            .map(|(g, ids)| {
                let position: AHashMap<&str, usize> = ids
                    .iter()
                    .enumerate()
                    .map(|(i, id)| (id.as_str(), i))
                    .collect();
                let mut set = AHashSet::new();
                for node in g.nodes() {
                    let Some(&from) = position.get(node.id()) else {
                        continue;
                    };
                    for (child, _) in node.children() {
                        if let Some(&to) = g.id_of(child).and_then(|id| position.get(id)) {
                            set.insert((from, to));
                        }
                    }
                }
                set
            })
            .collect();

        let index_tuples: Vec<Vec<usize>> = id_lists
            .iter()
            .map(|ids| 0..ids.len())
            .multi_cartesian_product()
            .collect();

        #[cfg(feature = "rayon")]
        let pairs: Vec<(usize, usize)> = (0..index_tuples.len())
            .into_par_iter()
            .flat_map_iter(|i| {
                let (index_tuples, edge_sets) = (&index_tuples, &edge_sets);
                ((i + 1)..index_tuples.len())
                    .filter(move |&j| coordinates_agree(edge_sets, &index_tuples[i], &index_tuples[j]))
                    .map(move |j| (i, j))
            })
            .collect();

        #[cfg(not(feature = "rayon"))]
        let pairs: Vec<(usize, usize)> = (0..index_tuples.len())
            .flat_map(|i| {
                let (index_tuples, edge_sets) = (&index_tuples, &edge_sets);
                ((i + 1)..index_tuples.len())
                    .filter(move |&j| coordinates_agree(edge_sets, &index_tuples[i], &index_tuples[j]))
                    .map(move |j| (i, j))
            })
            .collect();

        let tuples: Vec<NodeTuple> = index_tuples
            .iter()
            .map(|positions| {
                NodeTuple::new(
                    positions
                        .iter()
                        .enumerate()
                        .map(|(graph_idx, &pos)| id_lists[graph_idx][pos].clone())
                        .collect(),
                )
            })
            .collect();

        let mut adjacency: BTreeMap<NodeTuple, BTreeSet<NodeTuple>> = BTreeMap::new();
        for &(i, j) in &pairs {
            let a = tuples[i].clone();
            let b = tuples[j].clone();
            adjacency.entry(a.clone()).or_default().insert(b.clone());
            adjacency.entry(b).or_default().insert(a);
        }
        let nodes: BTreeSet<NodeTuple> = tuples.into_iter().collect();

        debug!(
            "product graph built: {} nodes, {} adjacent pairs",
            nodes.len(),
            pairs.len()
        );
        ProductGraph { nodes, adjacency }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tuples in lexicographic order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeTuple> {
        self.nodes.iter()
    }

    pub fn first_node(&self) -> Option<&NodeTuple> {
        self.nodes.iter().next()
    }

    pub fn neighbours(&self, tuple: &NodeTuple) -> Option<&BTreeSet<NodeTuple>> {
        self.adjacency.get(tuple)
    }

    pub fn degree(&self, tuple: &NodeTuple) -> usize {
        self.adjacency.get(tuple).map_or(0, BTreeSet::len)
    }
}

/// Adjacency predicate over index tuples: every coordinate graph must give
/// the same answer about undirected edge existence between the two entries.
fn coordinates_agree(edge_sets: &[AHashSet<(usize, usize)>], p: &[usize], q: &[usize]) -> bool {
    let mut expected = None;
    for (i, set) in edge_sets.iter().enumerate() {
        let present = set.contains(&(p[i], q[i])) || set.contains(&(q[i], p[i]));
        match expected {
            None => expected = Some(present),
            Some(prev) if prev != present => return false,
            Some(_) => {}
        }
    }
    expected.is_some()
}
