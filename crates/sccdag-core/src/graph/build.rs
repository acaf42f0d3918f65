//! Immutable weighted digraph and its adjacency views.
//!
//! # Overview
//!
//! Nodes are the integers `0..n`. Edges are kept in insertion order as
//! `(from, to, weight)` triples; parallel edges and self-loops are legal and
//! each is retained individually. Two adjacency views are built once at
//! construction time:
//!
//! - **unweighted**: for each node, its direct successors in edge-insertion
//!   order (one entry per edge, so parallel edges repeat the successor);
//! - **weighted**: the same sequence paired with each edge's weight.
//!
//! The only validation is a range check on every endpoint. A [`Graph`] that
//! exists is therefore always safe to index with any edge endpoint.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::instrument;

use crate::error::{AnalysisError, IdKind, Result};

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed weighted edge `from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    /// Tail node id.
    pub from: usize,
    /// Head node id.
    pub to: usize,
    /// Integer weight (may be zero or negative).
    pub weight: i64,
}

impl Edge {
    /// Create an edge `from -> to` with `weight`.
    #[must_use]
    pub const fn new(from: usize, to: usize, weight: i64) -> Self {
        Self { from, to, weight }
    }

    /// Returns `true` if the edge starts and ends at the same node.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl From<(usize, usize, i64)> for Edge {
    fn from((from, to, weight): (usize, usize, i64)) -> Self {
        Self::new(from, to, weight)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed, edge-weighted graph over nodes `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    node_count: usize,
    edges: Vec<Edge>,
    source: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_model: Option<String>,
    #[serde(skip)]
    successors: Vec<Vec<usize>>,
    #[serde(skip)]
    weighted_successors: Vec<Vec<(usize, i64)>>,
}

impl Graph {
    /// Build a graph with `node_count` nodes from `edges`.
    ///
    /// The source defaults to node `0`; use [`Graph::with_source`] to change
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::OutOfRange`] if any edge endpoint is not in
    /// `[0, node_count)`.
    #[instrument(skip(edges), fields(edge_count = edges.len()))]
    pub fn new(node_count: usize, edges: Vec<Edge>) -> Result<Self> {
        for edge in &edges {
            check_id(IdKind::EdgeSource, edge.from, node_count)?;
            check_id(IdKind::EdgeTarget, edge.to, node_count)?;
        }

        let mut successors = vec![Vec::new(); node_count];
        let mut weighted_successors = vec![Vec::new(); node_count];
        for edge in &edges {
            successors[edge.from].push(edge.to);
            weighted_successors[edge.from].push((edge.to, edge.weight));
        }

        Ok(Self {
            node_count,
            edges,
            source: 0,
            weight_model: None,
            successors,
            weighted_successors,
        })
    }

    /// Build a graph from `(from, to, weight)` triples.
    ///
    /// # Errors
    ///
    /// Same as [`Graph::new`].
    pub fn from_triples(node_count: usize, triples: &[(usize, usize, i64)]) -> Result<Self> {
        Self::new(node_count, triples.iter().copied().map(Edge::from).collect())
    }

    /// Set the designated source node for path queries.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::OutOfRange`] if `source >= node_count`.
    pub fn with_source(mut self, source: usize) -> Result<Self> {
        check_id(IdKind::Source, source, self.node_count)?;
        self.source = source;
        Ok(self)
    }

    /// Attach a free-form label describing how edge weights were assigned.
    #[must_use]
    pub fn with_weight_model(mut self, model: impl Into<String>) -> Self {
        self.weight_model = Some(model.into());
        self
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges, counting parallel edges individually.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The designated source node.
    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// The weight model label, if one was attached.
    #[must_use]
    pub fn weight_model(&self) -> Option<&str> {
        self.weight_model.as_deref()
    }

    /// Unweighted adjacency: `adjacency()[u]` lists the heads of `u`'s edges
    /// in insertion order.
    #[must_use]
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.successors
    }

    /// Weighted adjacency: `(head, weight)` per edge, in insertion order.
    #[must_use]
    pub fn weighted_adjacency(&self) -> &[Vec<(usize, i64)>] {
        &self.weighted_successors
    }

    /// Successors of `node`, or an empty slice if `node` is out of range.
    #[must_use]
    pub fn successors(&self, node: usize) -> &[usize] {
        self.successors.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `node` has an edge to itself.
    #[must_use]
    pub fn has_self_loop(&self, node: usize) -> bool {
        self.successors(node).contains(&node)
    }

    /// Directed density: `edges / (n * (n - 1))`, or `0.0` when `n <= 1`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        if self.node_count <= 1 {
            return 0.0;
        }
        let max_edges = self.node_count as f64 * (self.node_count - 1) as f64;
        self.edges.len() as f64 / max_edges
    }
}

/// Reject `id` unless it is in `[0, bound)`.
pub(crate) const fn check_id(what: IdKind, id: usize, bound: usize) -> Result<()> {
    if id < bound {
        Ok(())
    } else {
        Err(AnalysisError::OutOfRange { what, id, bound })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_has_no_adjacency() {
        let g = Graph::new(0, Vec::new()).expect("build graph");
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.adjacency().is_empty());
        assert!(g.density().abs() < f64::EPSILON);
    }

    #[test]
    fn adjacency_preserves_insertion_order() {
        let g = Graph::from_triples(4, &[(0, 3, 1), (0, 1, 2), (0, 2, 3), (2, 1, 4)])
            .expect("build graph");
        assert_eq!(g.adjacency()[0], vec![3, 1, 2]);
        assert_eq!(g.adjacency()[2], vec![1]);
        assert!(g.adjacency()[1].is_empty());
        assert_eq!(g.weighted_adjacency()[0], vec![(3, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn parallel_edges_are_each_retained() {
        let g = Graph::from_triples(2, &[(0, 1, 5), (0, 1, 9)]).expect("build graph");
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.adjacency()[0], vec![1, 1]);
        assert_eq!(g.weighted_adjacency()[0], vec![(1, 5), (1, 9)]);
    }

    #[test]
    fn self_loops_are_legal() {
        let g = Graph::from_triples(2, &[(1, 1, 1)]).expect("build graph");
        assert!(g.has_self_loop(1));
        assert!(!g.has_self_loop(0));
        assert!(g.edges()[0].is_self_loop());
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let err = Graph::from_triples(3, &[(0, 1, 1), (1, 3, 1)]).expect_err("must fail");
        assert_eq!(
            err,
            AnalysisError::OutOfRange {
                what: IdKind::EdgeTarget,
                id: 3,
                bound: 3,
            }
        );
    }

    #[test]
    fn out_of_range_source_endpoint_is_rejected() {
        let err = Graph::from_triples(2, &[(5, 0, 1)]).expect_err("must fail");
        assert!(matches!(
            err,
            AnalysisError::OutOfRange {
                what: IdKind::EdgeSource,
                id: 5,
                ..
            }
        ));
    }

    #[test]
    fn source_is_range_checked() {
        let g = Graph::from_triples(3, &[(0, 1, 1)]).expect("build graph");
        assert_eq!(g.source(), 0);

        let g = g.with_source(2).expect("valid source");
        assert_eq!(g.source(), 2);

        let err = g.with_source(3).expect_err("must fail");
        assert!(matches!(
            err,
            AnalysisError::OutOfRange {
                what: IdKind::Source,
                ..
            }
        ));
    }

    #[test]
    fn density_counts_parallel_edges() {
        // 3 nodes → 6 possible ordered pairs.
        let g = Graph::from_triples(3, &[(0, 1, 1), (1, 2, 1), (0, 1, 1)]).expect("build graph");
        assert!((g.density() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn weight_model_round_trips() {
        let g = Graph::new(1, Vec::new())
            .expect("build graph")
            .with_weight_model("edge");
        assert_eq!(g.weight_model(), Some("edge"));
    }
}
