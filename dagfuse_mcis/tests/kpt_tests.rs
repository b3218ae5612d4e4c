use std::collections::VecDeque;

use dagfuse_graph::Graph;
use dagfuse_mcis::{Algorithm, AlgorithmError, MatchConfig, McisRunner};

fn run_kpt(graphs: &[&Graph]) -> Result<Vec<Graph>, AlgorithmError> {
    McisRunner::new().run(graphs, Algorithm::Kpt, None)
}

/// Directed reachability over string ids, for checking result independence.
fn reachable(g: &Graph, start: &str, end: &str) -> bool {
    if start == end {
        return true;
    }
    let Some(start_h) = g.node_id(start) else {
        return false;
    };
    let Some(end_h) = g.node_id(end) else {
        return false;
    };
    let mut visited = vec![start_h];
    let mut queue = VecDeque::from([start_h]);
    while let Some(current) = queue.pop_front() {
        let Some(node) = g.node(current) else {
            continue;
        };
        for (child, _) in node.children() {
            if child == end_h {
                return true;
            }
            if !visited.contains(&child) {
                visited.push(child);
                queue.push_back(child);
            }
        }
    }
    false
}

fn hyperedges_conflict(graphs: &[&Graph], p: &[&str], q: &[&str]) -> bool {
    if p == q {
        return true;
    }
    graphs
        .iter()
        .enumerate()
        .any(|(i, g)| reachable(g, p[i], q[i]) || reachable(g, q[i], p[i]))
}

fn two_node_edge_graph(a: &str, b: &str) -> Graph {
    let mut g = Graph::new();
    g.add_node_set([a, b]).unwrap();
    g.add_edge(a, b, 1).unwrap();
    g
}

#[test]
fn matching_on_identical_edges_is_non_empty_and_independent() {
    let g1 = two_node_edge_graph("A", "B");
    let g2 = two_node_edge_graph("A", "B");

    let results = run_kpt(&[&g1, &g2]).unwrap();
    assert_eq!(results.len(), 1);
    let matching = &results[0];
    assert!(matching.get_num_nodes() >= 1);
    assert!(matching.get_num_nodes() <= 2);
    // A -> B makes (A,A) and (B,B) conflict, so at most one of them appears.
    assert!(!(matching.get_node("A_A").is_some() && matching.get_node("B_B").is_some()));
    // The matching carries no structural edges.
    assert!(matching.nodes().all(|n| n.is_sink() && n.is_source()));
}

#[test]
fn an_edge_in_any_graph_is_enough_for_a_conflict() {
    let g1 = two_node_edge_graph("A", "B");
    let mut g2 = Graph::new();
    g2.add_node_set(["A", "B"]).unwrap();

    let results = run_kpt(&[&g1, &g2]).unwrap();
    let matching = &results[0];
    assert!(matching.get_num_nodes() <= 2);
    assert!(!(matching.get_node("A_A").is_some() && matching.get_node("B_B").is_some()));
}

#[test]
fn independent_nodes_can_both_be_matched() {
    let mut g1 = Graph::new();
    g1.add_node_set(["A", "B"]).unwrap();
    let mut g2 = Graph::new();
    g2.add_node_set(["X", "Y"]).unwrap();

    let results = run_kpt(&[&g1, &g2]).unwrap();
    let matching = &results[0];
    assert_eq!(matching.get_num_nodes(), 2);
    assert!(matching.get_node("A_X").is_some());
    assert!(matching.get_node("B_Y").is_some());
}

#[test]
fn matched_hyperedges_never_conflict() {
    // One reachable pair per graph plus isolated nodes gives the matcher
    // both conflicting and independent candidates.
    let mut g1 = Graph::new();
    g1.add_node_set(["A", "B", "C"]).unwrap();
    g1.add_edge("A", "B", 0).unwrap();
    let mut g2 = Graph::new();
    g2.add_node_set(["X", "Y", "Z"]).unwrap();
    g2.add_edge("X", "Y", 0).unwrap();
    let graphs = [&g1, &g2];

    let results = run_kpt(&graphs).unwrap();
    let matching = &results[0];
    assert!(matching.get_num_nodes() >= 1);

    let members: Vec<Vec<&str>> = matching
        .nodes()
        .map(|n| n.id().split('_').collect())
        .collect();
    for (i, p) in members.iter().enumerate() {
        for q in members.iter().skip(i + 1) {
            assert!(
                !hyperedges_conflict(&graphs, p, q),
                "matching kept conflicting hyperedges {p:?} and {q:?}"
            );
        }
    }
}

#[test]
fn empty_inputs_are_a_precondition_failure() {
    let empty = Graph::new();
    let mut single = Graph::new();
    single.add_node("A").unwrap();

    assert_eq!(run_kpt(&[]), Err(AlgorithmError::EmptyGraph));
    assert_eq!(
        run_kpt(&[&empty, &single]),
        Err(AlgorithmError::EmptyGraph)
    );
    assert_eq!(
        run_kpt(&[&single, &empty]),
        Err(AlgorithmError::EmptyGraph)
    );
}

#[test]
fn expired_deadline_yields_an_empty_matching() {
    let g1 = two_node_edge_graph("A", "B");
    let g2 = two_node_edge_graph("A", "B");

    let runner = McisRunner::with_config(MatchConfig::with_timeout_ms(0));
    let results = runner.run(&[&g1, &g2], Algorithm::Kpt, None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get_num_nodes(), 0);
}

#[test]
fn repeated_runs_return_identical_results() {
    let mut g1 = Graph::new();
    g1.add_node_set(["A", "B", "C"]).unwrap();
    g1.add_edge("A", "B", 0).unwrap();
    let mut g2 = Graph::new();
    g2.add_node_set(["X", "Y"]).unwrap();

    let first = run_kpt(&[&g1, &g2]).unwrap();
    let second = run_kpt(&[&g1, &g2]).unwrap();
    assert_eq!(first, second);
}
