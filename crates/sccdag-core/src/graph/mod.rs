//! Graph analysis stages.
//!
//! # Overview
//!
//! Each stage consumes only the immutable output of the previous one and
//! returns a new, independently owned value.
//!
//! ## Pipeline
//!
//! ```text
//! edges (u, v, w)
//!        ↓  build::Graph::new()
//! Graph (adjacency views, may contain cycles)
//!        ↓  scc::SccDecomposition::from_graph()
//! SccDecomposition (components in closing order + node → component map)
//!        ↓  condense::Condensation::build()
//! Condensation (DAG over component ids, max-weight dedup edges)
//!        ↓  topo::topological_sort()
//! Vec<usize> (Kahn order of the condensation)
//!        ↓  critical_path::{shortest_paths, longest_paths}()
//! PathResult ×2 (distances, predecessors, critical path)
//! ```
//!
//! [`crate::analyze`] runs the whole pipeline and bundles the results.
//!
//! ## Typical Usage
//!
//! ```rust
//! use sccdag_core::graph::{Condensation, Graph, SccDecomposition, topological_sort};
//! use sccdag_core::NoopMetrics;
//!
//! let graph = Graph::from_triples(3, &[(0, 1, 5), (1, 2, 3)])?;
//! let scc = SccDecomposition::from_graph(&graph, &mut NoopMetrics);
//! let dag = Condensation::build(&graph, &scc, &mut NoopMetrics);
//! let order = topological_sort(dag.adjacency(), &mut NoopMetrics)?;
//! assert_eq!(order.len(), dag.node_count());
//! # Ok::<(), sccdag_core::AnalysisError>(())
//! ```

pub mod build;
pub mod condense;
pub mod critical_path;
pub mod scc;
pub mod stats;
pub mod topo;

// Re-export primary types at module level for convenience.
pub use build::{Edge, Graph};
pub use condense::{CondensedEdge, Condensation};
pub use critical_path::{PathKind, PathResult, longest_paths, reconstruct_path, shortest_paths};
pub use scc::{Component, SccDecomposition, find_sccs};
pub use stats::GraphStats;
pub use topo::topological_sort;
