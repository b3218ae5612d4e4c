use dagfuse_graph::Graph;
use dagfuse_mcis::{
    Algorithm, AlgorithmError, BronKerbosch, MatchConfig, McisRunner,
};
use rstest::rstest;

/// Two-layer CDAG with the first two nodes tagged `hot`.
fn tagged_graph(ids: [&str; 4]) -> Graph {
    let mut g = Graph::new();
    g.add_node_set(ids).unwrap();
    g.add_edge(ids[0], ids[1], 1).unwrap();
    g.add_edge(ids[1], ids[2], 1).unwrap();
    g.add_edge(ids[2], ids[3], 1).unwrap();
    g.set_node_tag(ids[0], "hot").unwrap();
    g.set_node_tag(ids[1], "hot").unwrap();
    g.set_node_tag(ids[2], "cold").unwrap();
    g
}

#[rstest]
#[case::bron_kerbosch(Algorithm::BronKerboschSerial)]
#[case::kpt(Algorithm::Kpt)]
fn tag_filtering_commutes_with_dispatch(#[case] algorithm: Algorithm) {
    let g1 = tagged_graph(["A", "B", "C", "D"]);
    let g2 = tagged_graph(["P", "Q", "R", "S"]);
    let runner = McisRunner::new();

    let through_runner = runner.run(&[&g1, &g2], algorithm, Some("hot")).unwrap();

    let p1 = g1.get_subgraph_with_tag("hot");
    let p2 = g2.get_subgraph_with_tag("hot");
    let pre_projected = runner.run(&[&p1, &p2], algorithm, None).unwrap();

    assert_eq!(through_runner, pre_projected);
}

#[test]
fn tagged_run_sees_only_the_tagged_subgraphs() {
    let g1 = tagged_graph(["A", "B", "C", "D"]);
    let g2 = tagged_graph(["P", "Q", "R", "S"]);
    let runner = McisRunner::new();

    let results = runner
        .run(&[&g1, &g2], Algorithm::BronKerboschSerial, Some("hot"))
        .unwrap();
    assert!(!results.is_empty());
    // Only A/B and P/Q survive the projection, so no result node mentions
    // the cold or untagged ids.
    for result in &results {
        assert!(result.get_num_nodes() <= 2);
        for node in result.nodes() {
            assert!(!node.id().contains('C'));
            assert!(!node.id().contains('R'));
        }
    }
}

#[test]
fn missing_tag_projects_to_empty_inputs() {
    let g1 = tagged_graph(["A", "B", "C", "D"]);
    let g2 = tagged_graph(["P", "Q", "R", "S"]);
    let runner = McisRunner::new();

    assert_eq!(
        runner.run(&[&g1, &g2], Algorithm::BronKerboschSerial, Some("missing")),
        Err(AlgorithmError::EmptyGraph)
    );
}

#[test]
fn uninstalled_algorithms_are_rejected() {
    let g1 = tagged_graph(["A", "B", "C", "D"]);
    let runner =
        McisRunner::with_algorithms(&[Algorithm::BronKerboschSerial], MatchConfig::default());

    assert!(runner
        .run(&[&g1, &g1], Algorithm::BronKerboschSerial, None)
        .is_ok());
    assert_eq!(
        runner.run(&[&g1, &g1], Algorithm::Kpt, None),
        Err(AlgorithmError::InvalidAlgorithm)
    );
}

#[test]
fn run_with_accepts_a_caller_supplied_engine() {
    let g1 = tagged_graph(["A", "B", "C", "D"]);
    let g2 = tagged_graph(["P", "Q", "R", "S"]);
    let runner = McisRunner::new();

    let engine = BronKerbosch::new(MatchConfig::default());
    let direct = runner.run_with(&[&g1, &g2], &engine, None).unwrap();
    let routed = runner
        .run(&[&g1, &g2], Algorithm::BronKerboschSerial, None)
        .unwrap();
    assert_eq!(direct, routed);
}

#[test]
fn run_many_aggregates_per_algorithm() {
    let g1 = tagged_graph(["A", "B", "C", "D"]);
    let g2 = tagged_graph(["P", "Q", "R", "S"]);
    let runner = McisRunner::new();

    let all = runner
        .run_many(
            &[&g1, &g2],
            &[Algorithm::BronKerboschSerial, Algorithm::Kpt],
            None,
        )
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(!all[0].is_empty());
    assert!(!all[1].is_empty());
}

#[test]
fn run_many_short_circuits_on_the_first_error() {
    let empty = Graph::new();
    let runner = McisRunner::new();

    assert_eq!(
        runner.run_many(
            &[&empty],
            &[Algorithm::BronKerboschSerial, Algorithm::Kpt],
            None,
        ),
        Err(AlgorithmError::EmptyGraph)
    );
}

#[rstest]
#[case::bron_kerbosch(Algorithm::BronKerboschSerial)]
#[case::kpt(Algorithm::Kpt)]
fn dispatch_is_deterministic(#[case] algorithm: Algorithm) {
    let g1 = tagged_graph(["A", "B", "C", "D"]);
    let g2 = tagged_graph(["P", "Q", "R", "S"]);
    let runner = McisRunner::new();

    let first = runner.run(&[&g1, &g2], algorithm, None).unwrap();
    let second = runner.run(&[&g1, &g2], algorithm, None).unwrap();
    assert_eq!(first, second);
}
