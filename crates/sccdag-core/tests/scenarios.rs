//! Known-topology regression tests for the analysis pipeline.
//!
//! Each test uses a hand-crafted graph whose components, order and
//! distances can be worked out on paper. Expected values are hardcoded.

use sccdag_core::graph::topo::positions;
use sccdag_core::graph::{Condensation, Graph, SccDecomposition, topological_sort};
use sccdag_core::{NoopMetrics, OperationCounter, analyze};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn graph(n: usize, edges: &[(usize, usize, i64)]) -> Graph {
    Graph::from_triples(n, edges).expect("build graph")
}

fn unit(n: usize, edges: &[(usize, usize)]) -> Graph {
    let triples: Vec<(usize, usize, i64)> = edges.iter().map(|&(u, v)| (u, v, 1)).collect();
    graph(n, &triples)
}

fn sorted_components(scc: &SccDecomposition) -> Vec<Vec<usize>> {
    let mut out: Vec<Vec<usize>> = scc
        .components()
        .iter()
        .map(|c| {
            let mut nodes = c.nodes().to_vec();
            nodes.sort_unstable();
            nodes
        })
        .collect();
    out.sort();
    out
}

// ---------------------------------------------------------------------------
// SCC
// ---------------------------------------------------------------------------

#[test]
fn triangle_and_self_loop() {
    let g = unit(4, &[(0, 1), (1, 2), (2, 0), (3, 3)]);
    let scc = SccDecomposition::from_graph(&g, &mut NoopMetrics);

    assert_eq!(scc.len(), 2);
    assert_eq!(sorted_components(&scc), vec![vec![0, 1, 2], vec![3]]);
    assert_eq!(scc.largest(), 3);
    assert_eq!(scc.smallest(), 1);
    // Both components are cycles: one by size, one by self-loop.
    assert_eq!(scc.cycle_count(&g), 2);
}

#[test]
fn two_cycles_joined_one_way() {
    // {0,1} → {2,3}
    let g = unit(4, &[(0, 1), (1, 0), (1, 2), (2, 3), (3, 2)]);
    let scc = SccDecomposition::from_graph(&g, &mut NoopMetrics);
    let dag = Condensation::build(&g, &scc, &mut NoopMetrics);

    assert_eq!(sorted_components(&scc), vec![vec![0, 1], vec![2, 3]]);
    assert_eq!(dag.edge_count(), 1);

    let from = scc.component_of(0).expect("component of 0");
    let to = scc.component_of(2).expect("component of 2");
    assert!(dag.contains_edge(from, to));
    assert!(!dag.contains_edge(to, from));
}

#[test]
fn isolated_nodes_are_singletons() {
    let g = unit(5, &[]);
    let scc = SccDecomposition::from_graph(&g, &mut NoopMetrics);
    assert_eq!(scc.len(), 5);
    assert_eq!(scc.cycle_count(&g), 0);
}

// ---------------------------------------------------------------------------
// Topological order
// ---------------------------------------------------------------------------

#[test]
fn dag_order_respects_every_edge() {
    let g = unit(4, &[(0, 1), (0, 3), (1, 2)]);
    let scc = SccDecomposition::from_graph(&g, &mut NoopMetrics);
    assert_eq!(scc.len(), 4);
    assert!(scc.components().iter().all(|c| c.len() == 1));

    let dag = Condensation::build(&g, &scc, &mut NoopMetrics);
    let order = topological_sort(dag.adjacency(), &mut NoopMetrics).expect("sort");
    let pos = positions(&order, dag.node_count());

    let at = |node: usize| pos[scc.component_of(node).expect("component")];
    assert!(at(0) < at(1));
    assert!(at(1) < at(2));
    assert!(at(0) < at(3));
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn weighted_chain_from_source_zero() {
    let g = graph(3, &[(0, 1, 5), (1, 2, 3)]);
    let report = analyze(&g, &mut NoopMetrics).expect("analyze");

    let end = report.components.component_of(2).expect("component of 2");
    assert_eq!(report.shortest.distance(end), Some(8));
    assert_eq!(report.critical_path_length(), Some(8));
    assert_eq!(report.expand_path(report.critical_path()), vec![0, 1, 2]);
}

#[test]
fn parallel_edges_keep_the_heaviest_weight() {
    // Two 0 → 1 edges; the condensation keeps 7 for both searches.
    let g = graph(2, &[(0, 1, 2), (0, 1, 7)]);
    let report = analyze(&g, &mut NoopMetrics).expect("analyze");

    let end = report.components.component_of(1).expect("component of 1");
    assert_eq!(report.shortest.distance(end), Some(7));
    assert_eq!(report.longest.distance(end), Some(7));
}

#[test]
fn diamond_shortest_and_longest_differ() {
    // 0 → 1 → 3 costs 2, 0 → 2 → 3 costs 10.
    let g = graph(4, &[(0, 1, 1), (1, 3, 1), (0, 2, 5), (2, 3, 5)]);
    let report = analyze(&g, &mut NoopMetrics).expect("analyze");

    let end = report.components.component_of(3).expect("component of 3");
    assert_eq!(report.shortest.distance(end), Some(2));
    assert_eq!(report.longest.distance(end), Some(10));

    let shortest = report.shortest.path_to(end).expect("reachable");
    assert_eq!(report.expand_path(&shortest), vec![0, 1, 3]);
    assert_eq!(report.expand_path(report.critical_path()), vec![0, 2, 3]);
}

#[test]
fn source_inside_a_cycle() {
    // {1,2} cycle reachable from 0; source 2 cannot reach 0.
    let g = graph(4, &[(0, 1, 1), (1, 2, 1), (2, 1, 1), (2, 3, 4)])
        .with_source(2)
        .expect("source");
    let report = analyze(&g, &mut NoopMetrics).expect("analyze");

    let start = report.components.component_of(2).expect("component of 2");
    assert_eq!(report.source_component, start);
    assert!(!report.shortest.is_reachable(report.components.component_of(0).expect("c0")));
    assert_eq!(report.critical_path_length(), Some(4));

    let mut expanded = report.expand_path(report.critical_path());
    expanded.sort_unstable();
    assert_eq!(expanded, vec![1, 2, 3]);
}

// ---------------------------------------------------------------------------
// Instrumentation
// ---------------------------------------------------------------------------

#[test]
fn counter_and_noop_agree() {
    let g = graph(
        6,
        &[(0, 1, 3), (1, 2, 1), (2, 0, 2), (2, 3, 4), (3, 4, 1), (4, 3, 1), (4, 5, 9)],
    );

    let quiet = analyze(&g, &mut NoopMetrics).expect("noop");
    let mut counter = OperationCounter::new();
    let counted = analyze(&g, &mut counter).expect("counted");

    assert_eq!(quiet.components, counted.components);
    assert_eq!(quiet.condensation, counted.condensation);
    assert_eq!(quiet.topological_order, counted.topological_order);
    assert_eq!(quiet.shortest, counted.shortest);
    assert_eq!(quiet.longest, counted.longest);
    assert!(counted.summary.operations > 0);
}
