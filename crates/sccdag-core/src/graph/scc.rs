//! Strongly connected components via Tarjan's low-link algorithm.
//!
//! # Algorithm
//!
//! A depth-first traversal assigns every node a discovery index and a
//! low-link value and keeps visited-but-unassigned nodes on a traversal
//! stack. A node roots a component exactly when its low-link equals its own
//! discovery index; the component is then popped off the traversal stack
//! down to (and including) the root, in popped order.
//!
//! The traversal is iterative: an explicit work stack holds one
//! `(node, next successor position)` frame per active call, so chains of
//! millions of nodes do not exhaust the thread stack. Discovery, low-link
//! and closing order are the same as in the textbook recursive version.
//!
//! # Ordering guarantees
//!
//! - Top-level roots are tried in increasing node id.
//! - Successors are visited in adjacency (edge-insertion) order.
//! - Components are emitted in the order their roots close, which is a
//!   reverse topological order of the condensation: a component is only
//!   emitted after every component reachable from it.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{IdKind, Result};
use crate::graph::build::{Graph, check_id};
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// One strongly connected component: original node ids in popped order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Component {
    nodes: Vec<usize>,
}

impl Component {
    /// Member node ids, innermost-discovered first, root last.
    #[must_use]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Number of member nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for components produced by the detector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node whose low-link closed this component.
    #[must_use]
    pub fn root(&self) -> Option<usize> {
        self.nodes.last().copied()
    }

    /// Returns `true` if `node` belongs to this component.
    #[must_use]
    pub fn contains(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns `true` if the component contains a cycle.
    ///
    /// A component with more than one member always does; a singleton only
    /// does when its node has a self-loop in `graph`.
    #[must_use]
    pub fn is_cycle(&self, graph: &Graph) -> bool {
        match self.nodes.as_slice() {
            [] => false,
            [only] => graph.has_self_loop(*only),
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// SccDecomposition
// ---------------------------------------------------------------------------

/// All components of a graph plus the node → component map.
///
/// Component ids are positions in [`SccDecomposition::components`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccDecomposition {
    components: Vec<Component>,
    #[serde(skip)]
    component_of: Vec<usize>,
}

impl SccDecomposition {
    /// Run the detector over `graph`'s unweighted adjacency.
    #[must_use]
    #[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn from_graph(graph: &Graph, metrics: &mut dyn Metrics) -> Self {
        let result = Tarjan::new(graph.adjacency()).run(metrics);
        debug!(components = result.len(), "scc detection complete");
        result
    }

    /// Components in closing order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` for the decomposition of an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component id of `node`, or `None` if `node` is out of range.
    #[must_use]
    pub fn component_of(&self, node: usize) -> Option<usize> {
        self.component_of
            .get(node)
            .copied()
            .filter(|&cid| cid != usize::MAX)
    }

    /// Dense node → component id map (indexed by node id).
    #[must_use]
    pub fn component_map(&self) -> &[usize] {
        &self.component_of
    }

    /// `flags[cid]` is [`Component::is_cycle`] for component `cid`.
    #[must_use]
    pub fn cycle_flags(&self, graph: &Graph) -> Vec<bool> {
        self.components.iter().map(|c| c.is_cycle(graph)).collect()
    }

    /// Number of components that contain a cycle (see [`Component::is_cycle`]).
    #[must_use]
    pub fn cycle_count(&self, graph: &Graph) -> usize {
        self.components.iter().filter(|c| c.is_cycle(graph)).count()
    }

    /// Size of the largest component (0 for an empty graph).
    #[must_use]
    pub fn largest(&self) -> usize {
        self.components.iter().map(Component::len).max().unwrap_or(0)
    }

    /// Size of the smallest component (0 for an empty graph).
    #[must_use]
    pub fn smallest(&self) -> usize {
        self.components.iter().map(Component::len).min().unwrap_or(0)
    }

    /// Mean component size (0.0 for an empty graph).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_size(&self) -> f64 {
        if self.components.is_empty() {
            return 0.0;
        }
        let total: usize = self.components.iter().map(Component::len).sum();
        total as f64 / self.components.len() as f64
    }
}

/// Find the strongly connected components of an adjacency list.
///
/// `adjacency[u]` lists the successors of node `u`; the node count is
/// `adjacency.len()`.
///
/// # Errors
///
/// Returns [`crate::AnalysisError::OutOfRange`] if any successor id is not a
/// valid node.
pub fn find_sccs(adjacency: &[Vec<usize>], metrics: &mut dyn Metrics) -> Result<SccDecomposition> {
    let n = adjacency.len();
    for &to in adjacency.iter().flatten() {
        check_id(IdKind::EdgeTarget, to, n)?;
    }
    Ok(Tarjan::new(adjacency).run(metrics))
}

// ---------------------------------------------------------------------------
// Tarjan internals
// ---------------------------------------------------------------------------

/// Per-node traversal state, present once the node has been discovered.
#[derive(Debug, Clone, Copy)]
struct NodeState {
    index: usize,
    low_link: usize,
    on_stack: bool,
}

/// One suspended call of the depth-first traversal.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    next: usize,
}

struct Tarjan<'a> {
    adjacency: &'a [Vec<usize>],
    states: Vec<Option<NodeState>>,
    next_index: usize,
    stack: Vec<usize>,
    components: Vec<Component>,
}

impl<'a> Tarjan<'a> {
    fn new(adjacency: &'a [Vec<usize>]) -> Self {
        Self {
            adjacency,
            states: vec![None; adjacency.len()],
            next_index: 0,
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn run(mut self, metrics: &mut dyn Metrics) -> SccDecomposition {
        for start in 0..self.adjacency.len() {
            if self.states[start].is_none() {
                self.traverse(start, metrics);
            }
        }

        let mut component_of = vec![usize::MAX; self.adjacency.len()];
        for (cid, component) in self.components.iter().enumerate() {
            for &node in &component.nodes {
                component_of[node] = cid;
            }
        }

        SccDecomposition {
            components: self.components,
            component_of,
        }
    }

    fn discover(&mut self, node: usize, metrics: &mut dyn Metrics) {
        metrics.increment_operation_count();
        self.states[node] = Some(NodeState {
            index: self.next_index,
            low_link: self.next_index,
            on_stack: true,
        });
        self.next_index += 1;
        self.stack.push(node);
    }

    fn state(&self, node: usize) -> NodeState {
        // Only called for discovered nodes.
        self.states[node].unwrap_or(NodeState {
            index: usize::MAX,
            low_link: usize::MAX,
            on_stack: false,
        })
    }

    fn lower_link(&mut self, node: usize, candidate: usize) {
        if let Some(state) = self.states[node].as_mut() {
            state.low_link = state.low_link.min(candidate);
        }
    }

    fn traverse(&mut self, start: usize, metrics: &mut dyn Metrics) {
        self.discover(start, metrics);
        let mut frames = vec![Frame { node: start, next: 0 }];

        while let Some(frame) = frames.last_mut() {
            let at = frame.node;

            if let Some(&to) = self.adjacency[at].get(frame.next) {
                frame.next += 1;
                metrics.increment_operation_count();

                if self.states[to].is_none() {
                    // Descend; the low-link update for this edge happens
                    // when the child frame finishes.
                    self.discover(to, metrics);
                    frames.push(Frame { node: to, next: 0 });
                    continue;
                }

                let succ = self.state(to);
                if succ.on_stack {
                    self.lower_link(at, succ.low_link);
                }
                continue;
            }

            // All successors of `at` done: return from its call.
            frames.pop();
            let state = self.state(at);
            if state.low_link == state.index {
                self.close_component(at);
            }

            if let Some(parent) = frames.last() {
                let child = self.state(at);
                if child.on_stack {
                    self.lower_link(parent.node, child.low_link);
                }
            }
        }
    }

    /// Pop the traversal stack down to `root`, forming one component.
    fn close_component(&mut self, root: usize) {
        let root_index = self.state(root).index;
        let mut nodes = Vec::new();

        while let Some(node) = self.stack.pop() {
            if let Some(state) = self.states[node].as_mut() {
                state.on_stack = false;
                state.low_link = root_index;
            }
            nodes.push(node);
            if node == root {
                break;
            }
        }

        self.components.push(Component { nodes });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{NoopMetrics, OperationCounter};

    fn sccs(n: usize, edges: &[(usize, usize, i64)]) -> (Graph, SccDecomposition) {
        let graph = Graph::from_triples(n, edges).expect("build graph");
        let scc = SccDecomposition::from_graph(&graph, &mut NoopMetrics);
        (graph, scc)
    }

    fn sorted_members(scc: &SccDecomposition) -> Vec<Vec<usize>> {
        let mut out: Vec<Vec<usize>> = scc
            .components()
            .iter()
            .map(|c| {
                let mut v = c.nodes().to_vec();
                v.sort_unstable();
                v
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn empty_graph_has_no_components() {
        let (_, scc) = sccs(0, &[]);
        assert!(scc.is_empty());
        assert_eq!(scc.largest(), 0);
        assert!(scc.average_size().abs() < f64::EPSILON);
    }

    #[test]
    fn triangle_plus_self_loop_gives_two_components() {
        let (graph, scc) = sccs(4, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (3, 3, 1)]);

        assert_eq!(scc.len(), 2);
        assert_eq!(sorted_members(&scc), vec![vec![0, 1, 2], vec![3]]);
        assert_eq!(scc.largest(), 3);
        assert_eq!(scc.smallest(), 1);

        // The self-loop makes {3} a cycle too.
        assert_eq!(scc.cycle_count(&graph), 2);
        assert_eq!(scc.cycle_flags(&graph), vec![true, true]);
    }

    #[test]
    fn cycle_flags_mark_only_cyclic_components() {
        // {0,1} cycle → 2 → 3 (self-loop on 3 only).
        let (graph, scc) = sccs(4, &[(0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 3, 1), (3, 3, 1)]);
        let flags = scc.cycle_flags(&graph);

        assert_eq!(flags.len(), scc.len());
        let flag_of = |node: usize| flags[scc.component_of(node).expect("component")];
        assert!(flag_of(0));
        assert!(!flag_of(2));
        assert!(flag_of(3));
        assert_eq!(flags.iter().filter(|&&f| f).count(), scc.cycle_count(&graph));
    }

    #[test]
    fn triangle_components_in_popped_order() {
        // 0 → 1 → 2 → 0: 2 is discovered last and popped first; root 0 last.
        let (_, scc) = sccs(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]);
        assert_eq!(scc.components()[0].nodes(), &[2, 1, 0]);
        assert_eq!(scc.components()[0].root(), Some(0));
    }

    #[test]
    fn dag_gives_singletons_in_reverse_topological_order() {
        // 0 → 1, 0 → 3, 1 → 2
        let (graph, scc) = sccs(4, &[(0, 1, 1), (0, 3, 1), (1, 2, 1)]);

        let order: Vec<usize> = scc.components().iter().map(|c| c.nodes()[0]).collect();
        // DFS from 0 visits 1, then 2 (closes first), then 1, then 3, then 0.
        assert_eq!(order, vec![2, 1, 3, 0]);
        assert_eq!(scc.cycle_count(&graph), 0);
    }

    #[test]
    fn component_map_matches_positions() {
        let (_, scc) = sccs(5, &[(0, 1, 1), (1, 0, 1), (1, 2, 1), (3, 4, 1)]);
        for (cid, component) in scc.components().iter().enumerate() {
            for &node in component.nodes() {
                assert_eq!(scc.component_of(node), Some(cid));
            }
        }
        assert_eq!(scc.component_of(99), None);
    }

    #[test]
    fn isolated_nodes_are_singletons_in_id_order() {
        let (_, scc) = sccs(3, &[]);
        let order: Vec<&[usize]> = scc.components().iter().map(Component::nodes).collect();
        assert_eq!(order, vec![&[0][..], &[1][..], &[2][..]]);
    }

    #[test]
    fn nested_cycles_collapse_to_one_component() {
        // Two cycles sharing node 1: 0 → 1 → 0 and 1 → 2 → 3 → 1.
        let (_, scc) = sccs(
            5,
            &[(0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 3, 1), (3, 1, 1), (3, 4, 1)],
        );
        assert_eq!(sorted_members(&scc), vec![vec![0, 1, 2, 3], vec![4]]);
        // {4} is reachable from the big component, so it closes first.
        assert_eq!(scc.components()[0].nodes(), &[4]);
    }

    #[test]
    fn cross_edge_to_closed_component_does_not_merge() {
        // 0 → 1 → 0 closes before 2 is visited; 2 → 0 is a cross edge.
        let (_, scc) = sccs(3, &[(0, 1, 1), (1, 0, 1), (2, 0, 1)]);
        assert_eq!(sorted_members(&scc), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let n = 200_000;
        let edges: Vec<(usize, usize, i64)> = (0..n - 1).map(|i| (i, i + 1, 1)).collect();
        let (_, scc) = sccs(n, &edges);
        assert_eq!(scc.len(), n);
        // Deepest node closes first.
        assert_eq!(scc.components()[0].nodes(), &[n - 1]);
    }

    #[test]
    fn long_cycle_is_a_single_component() {
        let n = 100_000;
        let edges: Vec<(usize, usize, i64)> = (0..n).map(|i| (i, (i + 1) % n, 1)).collect();
        let (_, scc) = sccs(n, &edges);
        assert_eq!(scc.len(), 1);
        assert_eq!(scc.largest(), n);
    }

    #[test]
    fn counts_one_operation_per_node_and_edge() {
        let graph = Graph::from_triples(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (0, 2, 1)])
            .expect("build graph");
        let mut counter = OperationCounter::new();
        let _ = SccDecomposition::from_graph(&graph, &mut counter);
        assert_eq!(counter.operation_count(), 3 + 4);
    }

    #[test]
    fn find_sccs_rejects_dangling_successor() {
        let adjacency = vec![vec![1], vec![5]];
        let err = find_sccs(&adjacency, &mut NoopMetrics).expect_err("must fail");
        assert_eq!(err.code(), "E1001");
    }
}
