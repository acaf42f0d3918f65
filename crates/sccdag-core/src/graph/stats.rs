//! Summary statistics for one analysis run.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the original graph (parallel
//!   edges counted individually).
//! - **density**: `edge_count / (node_count * (node_count - 1))`; `0.0` for
//!   graphs with fewer than two nodes.
//! - **scc_count**, **cycle_count**: number of components and how many of
//!   them contain a cycle (size > 1, or a self-loop).
//! - **largest_scc**, **smallest_scc**, **average_scc_size**: component size
//!   distribution.
//! - **condensation_nodes** / **condensation_edges**: size of the DAG.
//! - **critical_path_length**: longest distance from the source component.
//! - **operations** / **elapsed_nanos**: whatever the metrics sink reported.

use serde::Serialize;

use crate::graph::build::Graph;
use crate::graph::condense::Condensation;
use crate::graph::critical_path::PathResult;
use crate::graph::scc::SccDecomposition;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for an analyzed graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of nodes in the original graph.
    pub node_count: usize,
    /// Number of edges in the original graph.
    pub edge_count: usize,
    /// Directed density of the original graph.
    pub density: f64,
    /// Source node of the original graph.
    pub source: usize,
    /// Weight model label carried by the input, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_model: Option<String>,
    /// Number of strongly connected components.
    pub scc_count: usize,
    /// Number of components containing a cycle.
    pub cycle_count: usize,
    /// Size of the largest component.
    pub largest_scc: usize,
    /// Size of the smallest component.
    pub smallest_scc: usize,
    /// Mean component size.
    pub average_scc_size: f64,
    /// Nodes in the condensation DAG (= `scc_count`).
    pub condensation_nodes: usize,
    /// Deduplicated edges in the condensation DAG.
    pub condensation_edges: usize,
    /// Length of the critical path, `None` when nothing was reached.
    pub critical_path_length: Option<i64>,
    /// Operations counted by the metrics sink across all stages.
    pub operations: u64,
    /// Elapsed time reported by the metrics sink.
    pub elapsed_nanos: u64,
}

impl GraphStats {
    /// Collect statistics from the outputs of every stage.
    #[must_use]
    pub fn collect(
        graph: &Graph,
        scc: &SccDecomposition,
        condensation: &Condensation,
        longest: &PathResult,
        metrics: &dyn Metrics,
    ) -> Self {
        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            density: graph.density(),
            source: graph.source(),
            weight_model: graph.weight_model().map(str::to_owned),
            scc_count: scc.len(),
            cycle_count: scc.cycle_count(graph),
            largest_scc: scc.largest(),
            smallest_scc: scc.smallest(),
            average_scc_size: scc.average_size(),
            condensation_nodes: condensation.node_count(),
            condensation_edges: condensation.edge_count(),
            critical_path_length: longest.critical_path_length,
            operations: metrics.operation_count(),
            elapsed_nanos: metrics.elapsed_nanos(),
        }
    }

    /// Returns `true` if the original graph had no cycles at all.
    #[must_use]
    pub const fn is_acyclic(&self) -> bool {
        self.cycle_count == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
