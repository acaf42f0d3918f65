#![forbid(unsafe_code)]
//! sccdag-core library.
//!
//! Strongly connected components, condensation DAG, topological order and
//! single-source shortest/longest paths for directed, integer-weighted
//! graphs.
//!
//! # Conventions
//!
//! - **Errors**: Return [`AnalysisError`] via the crate [`Result`] alias.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//!   The library never installs a subscriber.
//! - **Instrumentation**: Every stage takes `&mut dyn Metrics`; pass
//!   [`NoopMetrics`] when counts are not needed.
//!
//! # Example
//!
//! ```rust
//! use sccdag_core::{Graph, NoopMetrics, analyze};
//!
//! let graph = Graph::from_triples(3, &[(0, 1, 5), (1, 2, 3)])?;
//! let report = analyze(&graph, &mut NoopMetrics)?;
//!
//! assert_eq!(report.critical_path_length(), Some(8));
//! assert_eq!(report.expand_path(report.critical_path()), vec![0, 1, 2]);
//! # Ok::<(), sccdag_core::AnalysisError>(())
//! ```

pub mod analysis;
pub mod error;
pub mod graph;
pub mod metrics;

pub use analysis::{AnalysisReport, PathEntry, analyze};
pub use error::{AnalysisError, IdKind, Result};
pub use graph::{Graph, GraphStats};
pub use metrics::{Metrics, NoopMetrics, OperationCounter};
