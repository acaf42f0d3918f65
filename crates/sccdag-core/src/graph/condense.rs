//! SCC condensation: collapse each component into one node.
//!
//! # Overview
//!
//! Given the original graph and its [`SccDecomposition`], every original
//! edge `u -> v` whose endpoints fall in different components becomes an
//! edge `comp(u) -> comp(v)` of the condensation. Edges inside a component
//! are absorbed and dropped.
//!
//! - **Dedup**: at most one condensation edge per ordered component pair.
//!   Successor lists keep first-seen order (original nodes scanned in id
//!   order, each node's edges in insertion order).
//! - **Weight**: the maximum original weight among all edges crossing that
//!   ordered pair.
//!
//! Pairs are keyed by `(usize, usize)` directly. Querying the weight of a
//! pair with no condensation edge yields [`Condensation::DEFAULT_WEIGHT`];
//! the path engine never does this because it only walks recorded edges.
//!
//! Because components come from Tarjan's algorithm, the result is acyclic.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::build::Graph;
use crate::graph::scc::SccDecomposition;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// CondensedEdge
// ---------------------------------------------------------------------------

/// One deduplicated edge between two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CondensedEdge {
    /// Tail component id.
    pub from: usize,
    /// Head component id.
    pub to: usize,
    /// Maximum weight among the original edges crossing `from -> to`.
    pub weight: i64,
}

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// The condensation DAG over component ids `0..k`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condensation {
    /// `adjacency[c]`: distinct successor components of `c`, first-seen order.
    adjacency: Vec<Vec<usize>>,
    /// Edges in first-seen order.
    edges: Vec<CondensedEdge>,
    /// `(from, to)` → index into `edges`.
    #[serde(skip)]
    edge_index: HashMap<(usize, usize), usize>,
}

impl Condensation {
    /// Weight reported for a component pair with no recorded edge.
    pub const DEFAULT_WEIGHT: i64 = 1;

    /// Build the condensation of `graph` under `scc`.
    ///
    /// Records one operation per original edge examined.
    ///
    /// # Panics
    ///
    /// Panics if `scc` was computed for a graph with a different node count.
    #[must_use]
    #[instrument(skip_all, fields(components = scc.len()))]
    pub fn build(graph: &Graph, scc: &SccDecomposition, metrics: &mut dyn Metrics) -> Self {
        let component_of = scc.component_map();
        assert_eq!(
            component_of.len(),
            graph.node_count(),
            "SCC decomposition does not belong to this graph"
        );
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); scc.len()];
        let mut edges: Vec<CondensedEdge> = Vec::new();
        let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();

        for (u, successors) in graph.weighted_adjacency().iter().enumerate() {
            let cu = component_of[u];
            for &(v, weight) in successors {
                metrics.increment_operation_count();
                let cv = component_of[v];
                if cu == cv {
                    continue;
                }

                match edge_index.get(&(cu, cv)) {
                    Some(&idx) => {
                        let edge = &mut edges[idx];
                        edge.weight = edge.weight.max(weight);
                    }
                    None => {
                        edge_index.insert((cu, cv), edges.len());
                        edges.push(CondensedEdge {
                            from: cu,
                            to: cv,
                            weight,
                        });
                        adjacency[cu].push(cv);
                    }
                }
            }
        }

        debug!(
            nodes = adjacency.len(),
            edges = edges.len(),
            "condensation built"
        );

        Self {
            adjacency,
            edges,
            edge_index,
        }
    }

    /// Number of condensation nodes (= number of components).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of deduplicated condensation edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Successor lists indexed by component id.
    #[must_use]
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Distinct successors of `component` (empty if out of range).
    #[must_use]
    pub fn successors(&self, component: usize) -> &[usize] {
        self.adjacency.get(component).map(Vec::as_slice).unwrap_or_default()
    }

    /// All condensation edges in first-seen order.
    #[must_use]
    pub fn edges(&self) -> &[CondensedEdge] {
        &self.edges
    }

    /// Returns `true` if there is a condensation edge `from -> to`.
    #[must_use]
    pub fn contains_edge(&self, from: usize, to: usize) -> bool {
        self.edge_index.contains_key(&(from, to))
    }

    /// Derived weight of `from -> to`, or [`Self::DEFAULT_WEIGHT`] when the
    /// pair has no edge.
    #[must_use]
    pub fn weight(&self, from: usize, to: usize) -> i64 {
        self.edge_index
            .get(&(from, to))
            .map_or(Self::DEFAULT_WEIGHT, |&idx| self.edges[idx].weight)
    }

    /// Weighted successor lists: `(successor, weight)` in adjacency order.
    #[must_use]
    pub fn weighted_adjacency(&self) -> Vec<Vec<(usize, i64)>> {
        self.adjacency
            .iter()
            .enumerate()
            .map(|(from, succs)| succs.iter().map(|&to| (to, self.weight(from, to))).collect())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
