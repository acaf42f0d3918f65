//! Single-source shortest and longest paths on a DAG, plus the critical path.
//!
//! # Overview
//!
//! Both searches make a single relaxation pass over the nodes in
//! topological order. Each node's distance is final by the time it is
//! processed, because every predecessor precedes it in the order, so no
//! priority queue is needed and negative weights are fine.
//!
//! | Search   | Initial distance | Relax when                |
//! |----------|------------------|---------------------------|
//! | shortest | +∞ (`None`)      | `dist[u] + w < dist[v]`   |
//! | longest  | −∞ (`None`)      | `dist[u] + w > dist[v]`   |
//!
//! The source starts at `0`. Nodes still at `None` afterwards are
//! unreachable; they have no predecessor and no path.
//!
//! Additions saturate at the `i64` bounds instead of wrapping, so a distance
//! equal to `i64::MAX` or `i64::MIN` may understate the real path weight.
//!
//! # Critical path
//!
//! After the longest-path pass, nodes are scanned in increasing id order for
//! the maximum finite distance. The comparison is strict, so on a tie the
//! lowest id wins. The path to that node, rebuilt from predecessor links, is
//! the critical path.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{IdKind, Result};
use crate::graph::build::check_id;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which optimum a [`PathResult`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Minimum total weight; unreached means +∞.
    Shortest,
    /// Maximum total weight; unreached means −∞.
    Longest,
}

impl PathKind {
    /// Returns `true` if `candidate` should replace `current`.
    const fn improves(self, candidate: i64, current: i64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }
}

/// Distances and predecessors from one source over a DAG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    /// Which search produced this result.
    pub kind: PathKind,
    /// Source node of the search.
    pub source: usize,
    /// `distances[v]`: best total weight from `source`, `None` if unreached.
    ///
    /// Sums saturate at `i64::MIN`/`i64::MAX`. A clamped distance is smaller
    /// in magnitude than the true weight of the path to `v`.
    pub distances: Vec<Option<i64>>,
    /// `predecessors[v]`: previous node on the best path, `None` for the
    /// source and for unreached nodes.
    pub predecessors: Vec<Option<usize>>,
    /// Longest distance over all reached nodes (longest search only).
    pub critical_path_length: Option<i64>,
    /// Path from `source` to the critical endpoint (longest search only;
    /// empty otherwise).
    pub critical_path: Vec<usize>,
}

impl PathResult {
    /// Number of nodes covered by the result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Returns `true` if the underlying graph had no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Distance to `node`, or `None` if unreached or out of range.
    #[must_use]
    pub fn distance(&self, node: usize) -> Option<i64> {
        self.distances.get(node).copied().flatten()
    }

    /// Returns `true` if `node` was reached from the source.
    #[must_use]
    pub fn is_reachable(&self, node: usize) -> bool {
        self.distance(node).is_some()
    }

    /// Reached nodes in increasing id order.
    pub fn reachable(&self) -> impl Iterator<Item = usize> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter_map(|(node, d)| d.map(|_| node))
    }

    /// Best path from the source to `node`, or `None` if `node` is unreached.
    #[must_use]
    pub fn path_to(&self, node: usize) -> Option<Vec<usize>> {
        self.is_reachable(node)
            .then(|| reconstruct_path(&self.predecessors, node))
    }

    /// The critical endpoint (last node of the critical path), if any.
    #[must_use]
    pub fn critical_endpoint(&self) -> Option<usize> {
        self.critical_path.last().copied()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Shortest distances from `source` over a weighted DAG.
///
/// `adjacency[u]` lists `(v, weight)` pairs; `order` must be a topological
/// order of the same graph. Records one operation per node processed and one
/// per edge relaxed.
///
/// # Errors
///
/// Returns [`crate::AnalysisError::OutOfRange`] if `source`, an `order`
/// entry, or a successor id is not a node.
#[instrument(skip(adjacency, order, metrics), fields(nodes = adjacency.len()))]
pub fn shortest_paths(
    adjacency: &[Vec<(usize, i64)>],
    order: &[usize],
    source: usize,
    metrics: &mut dyn Metrics,
) -> Result<PathResult> {
    relax_in_order(PathKind::Shortest, adjacency, order, source, metrics)
}

/// Longest distances from `source` over a weighted DAG, plus the critical
/// path.
///
/// Same inputs and operation accounting as [`shortest_paths`].
///
/// # Errors
///
/// Same as [`shortest_paths`].
#[instrument(skip(adjacency, order, metrics), fields(nodes = adjacency.len()))]
pub fn longest_paths(
    adjacency: &[Vec<(usize, i64)>],
    order: &[usize],
    source: usize,
    metrics: &mut dyn Metrics,
) -> Result<PathResult> {
    let mut result = relax_in_order(PathKind::Longest, adjacency, order, source, metrics)?;

    let mut best: Option<(usize, i64)> = None;
    for (node, distance) in result.distances.iter().enumerate() {
        let Some(d) = *distance else {
            continue;
        };
        if best.is_none_or(|(_, b)| d > b) {
            best = Some((node, d));
        }
    }

    if let Some((end, length)) = best {
        result.critical_path_length = Some(length);
        result.critical_path = reconstruct_path(&result.predecessors, end);
        debug!(
            end,
            length,
            hops = result.critical_path.len().saturating_sub(1),
            "critical path found"
        );
    }

    Ok(result)
}

/// Rebuild the path ending at `end` by following predecessor links.
///
/// Walks back until a node with no predecessor, then reverses, so the
/// result runs from that start node to `end`. Returns `[end]` when `end`
/// has no predecessor and an empty path when `end` is out of range.
/// The walk is capped at `predecessors.len()` steps.
#[must_use]
pub fn reconstruct_path(predecessors: &[Option<usize>], end: usize) -> Vec<usize> {
    if end >= predecessors.len() {
        return Vec::new();
    }

    let mut path = vec![end];
    let mut at = end;
    while let Some(prev) = predecessors.get(at).copied().flatten() {
        if path.len() > predecessors.len() {
            break;
        }
        path.push(prev);
        at = prev;
    }

    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Relaxation
// ---------------------------------------------------------------------------

fn relax_in_order(
    kind: PathKind,
    adjacency: &[Vec<(usize, i64)>],
    order: &[usize],
    source: usize,
    metrics: &mut dyn Metrics,
) -> Result<PathResult> {
    let n = adjacency.len();
    check_id(IdKind::Source, source, n)?;

    let mut distances: Vec<Option<i64>> = vec![None; n];
    let mut predecessors: Vec<Option<usize>> = vec![None; n];
    distances[source] = Some(0);

    for &u in order {
        check_id(IdKind::Node, u, n)?;
        metrics.increment_operation_count();

        let Some(du) = distances[u] else {
            continue;
        };

        for &(v, weight) in &adjacency[u] {
            check_id(IdKind::EdgeTarget, v, n)?;
            metrics.increment_operation_count();

            let candidate = du.saturating_add(weight);
            if distances[v].is_none_or(|dv| kind.improves(candidate, dv)) {
                distances[v] = Some(candidate);
                predecessors[v] = Some(u);
            }
        }
    }

    Ok(PathResult {
        kind,
        source,
        distances,
        predecessors,
        critical_path_length: None,
        critical_path: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
