//! Error taxonomy for the analysis pipeline.
//!
//! Only two things can go wrong inside the core:
//!
//! - an id (edge endpoint or source) lies outside `[0, n)`, which is caught
//!   before any algorithm runs, and
//! - the topological sorter fails to emit every condensation node, which
//!   means the condensation step produced a graph that is not acyclic.
//!
//! Neither is a transient condition; both are contract violations and are
//! returned to the caller as-is.

use std::fmt;

/// Which kind of id was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// Tail of an edge (`u` in `u -> v`).
    EdgeSource,
    /// Head of an edge (`v` in `u -> v`).
    EdgeTarget,
    /// The designated start node or component of a path query.
    Source,
    /// A node id referenced anywhere else (component members, path ends).
    Node,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EdgeSource => "edge source",
            Self::EdgeTarget => "edge target",
            Self::Source => "source",
            Self::Node => "node",
        })
    }
}

/// Errors returned by the core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// An id was outside `[0, bound)`.
    #[error("{what} id {id} is out of range [0, {bound})")]
    OutOfRange {
        /// What the offending id was used as.
        what: IdKind,
        /// The offending id.
        id: usize,
        /// Exclusive upper bound (node or component count).
        bound: usize,
    },

    /// The topological sort emitted fewer nodes than the condensation has.
    #[error(
        "topological sort emitted {emitted} of {expected} condensation nodes; \
         the condensation graph is not acyclic"
    )]
    InvariantViolation {
        /// Number of nodes placed in the order before the queue ran dry.
        emitted: usize,
        /// Number of condensation nodes.
        expected: usize,
    },
}

impl AnalysisError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "E1001",
            Self::InvariantViolation { .. } => "E9001",
        }
    }

    /// Returns `true` for errors that indicate a bug in an upstream stage
    /// rather than bad caller input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

/// Result alias used throughout the core.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
