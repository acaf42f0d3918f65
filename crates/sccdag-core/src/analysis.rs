//! End-to-end pipeline: graph in, report out.
//!
//! [`analyze`] runs every stage in order against one [`Graph`] and collects
//! the results into an [`AnalysisReport`]. Path queries start from the
//! component that contains the graph's source node.
//!
//! The metrics sink is shared by all stages and is not reset here, so the
//! report's operation count is the total across the run.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::{AnalysisError, IdKind, Result};
use crate::graph::build::{Graph, check_id};
use crate::graph::condense::Condensation;
use crate::graph::critical_path::{PathResult, longest_paths, shortest_paths};
use crate::graph::scc::SccDecomposition;
use crate::graph::stats::GraphStats;
use crate::graph::topo::topological_sort;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One reachable component and the best path to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    /// Target component id.
    pub target: usize,
    /// Total weight of the path.
    pub distance: i64,
    /// Component ids from the source component to `target`.
    pub path: Vec<usize>,
    /// Whether this path is exactly the critical path.
    pub is_critical: bool,
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Summary statistics.
    pub summary: GraphStats,
    /// Strongly connected components in closing order.
    pub components: SccDecomposition,
    /// `cycle_flags[cid]`: component `cid` has more than one member or a
    /// self-loop.
    pub cycle_flags: Vec<bool>,
    /// Component that contains the graph's source node.
    pub source_component: usize,
    /// Condensation DAG.
    pub condensation: Condensation,
    /// Kahn order of the condensation.
    pub topological_order: Vec<usize>,
    /// Shortest distances from the source component.
    pub shortest: PathResult,
    /// Longest distances and critical path from the source component.
    pub longest: PathResult,
}

impl AnalysisReport {
    /// Critical path over component ids (empty for an empty graph).
    #[must_use]
    pub fn critical_path(&self) -> &[usize] {
        &self.longest.critical_path
    }

    /// Critical path length, if anything was reached.
    #[must_use]
    pub const fn critical_path_length(&self) -> Option<i64> {
        self.longest.critical_path_length
    }

    /// Shortest path to every reachable component, in component id order.
    #[must_use]
    pub fn shortest_paths(&self) -> Vec<PathEntry> {
        path_entries(&self.shortest, &self.longest.critical_path)
    }

    /// Longest path to every reachable component, in component id order.
    #[must_use]
    pub fn longest_paths(&self) -> Vec<PathEntry> {
        path_entries(&self.longest, &self.longest.critical_path)
    }

    /// Expand a component path into the original node ids of its members.
    #[must_use]
    pub fn expand_path(&self, path: &[usize]) -> Vec<usize> {
        path.iter()
            .filter_map(|&cid| self.components.components().get(cid))
            .flat_map(|c| c.nodes().iter().copied())
            .collect()
    }
}

fn path_entries(result: &PathResult, critical: &[usize]) -> Vec<PathEntry> {
    result
        .reachable()
        .filter_map(|target| {
            let distance = result.distance(target)?;
            let path = result.path_to(target)?;
            let is_critical = !critical.is_empty() && path == critical;
            Some(PathEntry {
                target,
                distance,
                path,
                is_critical,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run SCC detection, condensation, topological sort and both path searches.
///
/// # Errors
///
/// - [`AnalysisError::OutOfRange`] if the graph's source is not a node
///   (always the case for an empty graph).
/// - [`AnalysisError::InvariantViolation`] if the condensation turned out
///   cyclic.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn analyze(graph: &Graph, metrics: &mut dyn Metrics) -> Result<AnalysisReport> {
    check_id(IdKind::Source, graph.source(), graph.node_count())?;

    let scc = SccDecomposition::from_graph(graph, metrics);
    let condensation = Condensation::build(graph, &scc, metrics);
    let order = topological_sort(condensation.adjacency(), metrics)?;

    let source_component = scc
        .component_of(graph.source())
        .ok_or(AnalysisError::OutOfRange {
            what: IdKind::Source,
            id: graph.source(),
            bound: graph.node_count(),
        })?;

    let weighted = condensation.weighted_adjacency();
    let shortest = shortest_paths(&weighted, &order, source_component, metrics)?;
    let longest = longest_paths(&weighted, &order, source_component, metrics)?;

    let cycle_flags = scc.cycle_flags(graph);
    let summary = GraphStats::collect(graph, &scc, &condensation, &longest, metrics);
    debug!(
        scc_count = summary.scc_count,
        condensation_edges = summary.condensation_edges,
        "pipeline stages complete"
    );
    info!(
        critical_path_length = ?summary.critical_path_length,
        operations = summary.operations,
        "analysis complete"
    );

    Ok(AnalysisReport {
        summary,
        components: scc,
        cycle_flags,
        source_component,
        condensation,
        topological_order: order,
        shortest,
        longest,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
