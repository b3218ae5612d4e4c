//! Product-graph clique-enumeration engine.
//!
//! Maximal cliques of the N-wise product graph correspond to common induced
//! substructures of the inputs; the largest recorded cliques become the
//! result graphs. The search carries a wall-clock deadline and a clique-width
//! short-circuit, and degrades to a degree-compatibility heuristic when the
//! product graph would be too large to build cliques over.

use std::collections::BTreeSet;
use std::hash::BuildHasher;
use std::time::Instant;

use dagfuse_graph::Graph;
use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::error::AlgorithmError;
use crate::finder::McisFinder;
use crate::product::ProductGraph;
use crate::tuple::NodeTuple;

/// Fixed seeds for the fallback edge hash, so repeated runs agree.
const FALLBACK_EDGE_SEEDS: (u64, u64, u64, u64) = (
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
);

/// MCIS via maximal cliques of the N-wise product graph.
pub struct BronKerbosch {
    config: MatchConfig,
}

impl BronKerbosch {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    fn maximal_cliques(&self, product: &ProductGraph) -> Vec<BTreeSet<NodeTuple>> {
        let mut cliques = Vec::new();
        let candidates: BTreeSet<NodeTuple> = product.nodes().cloned().collect();
        let deadline = Instant::now() + self.config.timeout();
        self.bron_kerbosch(
            BTreeSet::new(),
            candidates,
            BTreeSet::new(),
            product,
            &mut cliques,
            deadline,
        );
        cliques
    }

    fn bron_kerbosch(
        &self,
        r: BTreeSet<NodeTuple>,
        mut p: BTreeSet<NodeTuple>,
        mut x: BTreeSet<NodeTuple>,
        product: &ProductGraph,
        cliques: &mut Vec<BTreeSet<NodeTuple>>,
        deadline: Instant,
    ) {
        if Instant::now() >= deadline {
            return;
        }
        if cliques
            .first()
            .is_some_and(|c| c.len() > self.config.max_clique_width)
        {
            return;
        }
        if p.is_empty() && x.is_empty() {
            if !r.is_empty() {
                cliques.push(r);
            }
            return;
        }

        let pivot = choose_pivot(&p, &x, product);
        let candidates: Vec<NodeTuple> = match pivot.as_ref().and_then(|t| product.neighbours(t)) {
            Some(pivot_neighbours) => p
                .iter()
                .filter(|v| !pivot_neighbours.contains(*v))
                .cloned()
                .collect(),
            None => p.iter().cloned().collect(),
        };

        for v in candidates {
            let neighbours = product.neighbours(&v);
            let mut r_next = r.clone();
            r_next.insert(v.clone());
            let p_next = match neighbours {
                Some(set) => p.intersection(set).cloned().collect(),
                None => BTreeSet::new(),
            };
            let x_next = match neighbours {
                Some(set) => x.intersection(set).cloned().collect(),
                None => BTreeSet::new(),
            };
            self.bron_kerbosch(r_next, p_next, x_next, product, cliques, deadline);
            p.remove(&v);
            x.insert(v);
        }
    }

    /// Bounded best-effort answer for oversized product graphs: pair every
    /// node of the first graph with one degree-compatible node per remaining
    /// graph, without ever building the product.
    fn find_simple_mcis(&self, graphs: &[&Graph]) -> Vec<Graph> {
        let first = graphs[0];
        let mut first_ids: Vec<&str> = first.nodes().map(|n| n.id()).collect();
        first_ids.sort_unstable();

        let rest_ids: Vec<Vec<&str>> = graphs[1..]
            .iter()
            .map(|g| {
                let mut ids: Vec<&str> = g.nodes().map(|n| n.id()).collect();
                ids.sort_unstable();
                ids
            })
            .collect();

        let mut names: Vec<String> = Vec::new();
        for anchor_id in first_ids {
            if names.len() >= self.config.fallback_node_cap {
                break;
            }
            let Some(anchor) = first.get_node(anchor_id) else {
                continue;
            };
            let mut parts: Vec<&str> = vec![anchor_id];
            let mut matched_all = true;
            for (offset, g) in graphs[1..].iter().enumerate() {
                let candidate = rest_ids[offset].iter().find(|id| {
                    g.get_node(id)
                        .is_some_and(|n| degrees_compatible(anchor.degree(), n.degree()))
                });
                match candidate {
                    Some(&id) => parts.push(id),
                    None => {
                        matched_all = false;
                        break;
                    }
                }
            }
            if matched_all {
                names.push(parts.join("_"));
            }
        }

        let mut result = Graph::new();
        for name in &names {
            let _ = result.add_node(name.clone());
        }
        let hasher = ahash::RandomState::with_seeds(
            FALLBACK_EDGE_SEEDS.0,
            FALLBACK_EDGE_SEEDS.1,
            FALLBACK_EDGE_SEEDS.2,
            FALLBACK_EDGE_SEEDS.3,
        );
        for (i, from) in names.iter().enumerate() {
            for to in names.iter().skip(i + 1) {
                if hasher.hash_one(format!("{from}{to}")) % 4 == 0 {
                    let _ = result.add_edge(from, to, 1);
                }
            }
        }
        debug!("degree heuristic produced {} nodes", names.len());
        vec![result]
    }
}

impl Default for BronKerbosch {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl McisFinder for BronKerbosch {
    fn find(&self, graphs: &[&Graph]) -> Result<Vec<Graph>, AlgorithmError> {
        if graphs.is_empty() || graphs.iter().any(|g| g.get_num_nodes() == 0) {
            return Err(AlgorithmError::EmptyGraph);
        }

        // The product holds exactly prod(|V_i|) nodes, so the size gate can
        // fire before anything is allocated.
        let product_size = graphs
            .iter()
            .try_fold(1usize, |acc, g| acc.checked_mul(g.get_num_nodes()))
            .unwrap_or(usize::MAX);
        if product_size > self.config.product_node_limit {
            info!(
                "product graph would hold {} nodes, past the {}-node gate; using the degree heuristic",
                product_size, self.config.product_node_limit
            );
            return Ok(self.find_simple_mcis(graphs));
        }

        let product = ProductGraph::build(graphs);

        let mut cliques = self.maximal_cliques(&product);
        if cliques.is_empty() {
            // Deadline expired before anything was recorded; a non-trivial
            // input still yields one product node.
            if let Some(first) = product.first_node() {
                cliques.push(BTreeSet::from([first.clone()]));
            }
        }

        let best = cliques.iter().map(BTreeSet::len).max().unwrap_or(0);
        let results: Vec<Graph> = cliques
            .iter()
            .filter(|c| c.len() == best)
            .map(|c| clique_to_graph(c, graphs))
            .collect();
        debug!(
            "{} maximal cliques recorded, {} of maximum size {}",
            cliques.len(),
            results.len(),
            best
        );
        Ok(results)
    }
}

/// Pivot rule: the highest product-graph degree over `P ∪ X`, ties broken by
/// first encounter; when nothing has positive degree, the first element of
/// `P`, else of `X`.
fn choose_pivot(
    p: &BTreeSet<NodeTuple>,
    x: &BTreeSet<NodeTuple>,
    product: &ProductGraph,
) -> Option<NodeTuple> {
    let mut best: Option<(&NodeTuple, usize)> = None;
    for candidate in p.iter().chain(x.iter()) {
        let degree = product.degree(candidate);
        if degree > 0 && best.map_or(true, |(_, d)| degree > d) {
            best = Some((candidate, degree));
        }
    }
    match best {
        Some((tuple, _)) => Some(tuple.clone()),
        None => p
            .iter()
            .next()
            .cloned()
            .or_else(|| x.iter().next().cloned()),
    }
}

/// Materializes one clique as a result graph: nodes are the joined tuple
/// ids, and a directed edge is kept only where every input graph has it.
fn clique_to_graph(clique: &BTreeSet<NodeTuple>, graphs: &[&Graph]) -> Graph {
    let mut result = Graph::new();
    result.reserve_nodes(clique.len());
    for tuple in clique {
        let _ = result.add_node(tuple.joined_id());
    }
    for from in clique {
        for to in clique {
            if from == to {
                continue;
            }
            let shared_everywhere = graphs
                .iter()
                .enumerate()
                .all(|(i, g)| g.contains_edge(from.get(i), to.get(i)));
            if shared_everywhere {
                let _ = result.add_edge(&from.joined_id(), &to.joined_id(), 1);
            }
        }
    }
    result
}

/// Structural compatibility: total degrees within half the smaller degree
/// (at least 1) of each other.
fn degrees_compatible(a: usize, b: usize) -> bool {
    a.abs_diff(b) <= std::cmp::max(1, a.min(b) / 2)
}
