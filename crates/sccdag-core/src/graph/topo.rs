//! Kahn's topological sort over an adjacency list.
//!
//! In-degrees are computed in one scan. A FIFO queue is seeded with every
//! zero in-degree node in increasing id order; each dequeued node is
//! appended to the order and its successors (in adjacency order) have their
//! in-degree decremented, entering the queue the moment it reaches zero.
//!
//! If the queue drains before every node is emitted the input had a cycle.
//! For a condensation that can only mean an upstream bug, so it is reported
//! as [`AnalysisError::InvariantViolation`].

use std::collections::VecDeque;

use tracing::{instrument, warn};

use crate::error::{AnalysisError, IdKind, Result};
use crate::graph::build::check_id;
use crate::metrics::Metrics;

/// Topologically sort `adjacency` (node count = `adjacency.len()`).
///
/// # Errors
///
/// - [`AnalysisError::OutOfRange`] if a successor id is not a node.
/// - [`AnalysisError::InvariantViolation`] if the graph contains a cycle.
#[instrument(skip_all, fields(nodes = adjacency.len()))]
pub fn topological_sort(adjacency: &[Vec<usize>], metrics: &mut dyn Metrics) -> Result<Vec<usize>> {
    let n = adjacency.len();
    let mut in_degree = vec![0usize; n];

    for &v in adjacency.iter().flatten() {
        metrics.increment_operation_count();
        check_id(IdKind::EdgeTarget, v, n)?;
        in_degree[v] += 1;
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    for (node, &degree) in in_degree.iter().enumerate() {
        metrics.increment_operation_count();
        if degree == 0 {
            queue.push_back(node);
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        metrics.increment_operation_count();
        order.push(u);

        for &v in &adjacency[u] {
            metrics.increment_operation_count();
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    if order.len() != n {
        warn!(emitted = order.len(), expected = n, "topological sort hit a cycle");
        return Err(AnalysisError::InvariantViolation {
            emitted: order.len(),
            expected: n,
        });
    }

    Ok(order)
}

/// Position of every node in `order` (`positions[node] = index`).
///
/// Nodes missing from `order` map to `usize::MAX`.
#[must_use]
pub fn positions(order: &[usize], node_count: usize) -> Vec<usize> {
    let mut pos = vec![usize::MAX; node_count];
    for (i, &node) in order.iter().enumerate() {
        if let Some(slot) = pos.get_mut(node) {
            *slot = i;
        }
    }
    pos
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
