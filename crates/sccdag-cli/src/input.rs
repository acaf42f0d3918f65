//! JSON graph files.
//!
//! ```json
//! {"n": 4, "edges": [{"u": 0, "v": 1, "w": 3}], "source": 0, "weight_model": "edge"}
//! ```
//!
//! `edges`, `source` and `weight_model` are optional; a missing `w` is 0.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sccdag_core::graph::{Edge, Graph};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: usize,
    pub v: usize,
    #[serde(default)]
    pub w: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphFile {
    pub n: usize,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub source: usize,
    #[serde(default, alias = "weightModel")]
    pub weight_model: Option<String>,
}

impl GraphFile {
    /// Parse a graph file from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("invalid graph JSON")
    }

    /// Build a validated [`Graph`], optionally overriding the source node.
    pub fn into_graph(self, source_override: Option<usize>) -> Result<Graph> {
        let edges = self
            .edges
            .iter()
            .map(|e| Edge::new(e.u, e.v, e.w))
            .collect();
        let mut graph = Graph::new(self.n, edges)?
            .with_source(source_override.unwrap_or(self.source))?;
        if let Some(model) = self.weight_model {
            graph = graph.with_weight_model(model);
        }
        Ok(graph)
    }
}

/// Read, parse and validate the graph stored at `path`.
pub fn load_graph(path: &Path, source_override: Option<usize>) -> Result<Graph> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file = GraphFile::from_json(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let graph = file
        .into_graph(source_override)
        .with_context(|| format!("Invalid graph in {}", path.display()))?;
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let file = GraphFile::from_json(
            r#"{"n": 3, "edges": [{"u": 0, "v": 1, "w": 5}, {"u": 1, "v": 2, "w": 3}],
                "source": 1, "weight_model": "edge"}"#,
        )
        .expect("parse");
        let graph = file.into_graph(None).expect("graph");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.source(), 1);
        assert_eq!(graph.weight_model(), Some("edge"));
    }

    #[test]
    fn optional_fields_default() {
        let file = GraphFile::from_json(r#"{"n": 2, "edges": [{"u": 0, "v": 1}]}"#).expect("parse");
        let graph = file.into_graph(None).expect("graph");
        assert_eq!(graph.source(), 0);
        assert_eq!(graph.weight_model(), None);
        assert_eq!(graph.edges()[0].weight, 0);
    }

    #[test]
    fn camel_case_weight_model_is_accepted() {
        let file =
            GraphFile::from_json(r#"{"n": 1, "weightModel": "node"}"#).expect("parse");
        assert_eq!(file.weight_model.as_deref(), Some("node"));
    }

    #[test]
    fn source_override_wins() {
        let file = GraphFile::from_json(r#"{"n": 3, "source": 0}"#).expect("parse");
        let graph = file.into_graph(Some(2)).expect("graph");
        assert_eq!(graph.source(), 2);
    }

    #[test]
    fn out_of_range_edge_is_rejected() {
        let file = GraphFile::from_json(r#"{"n": 2, "edges": [{"u": 0, "v": 5, "w": 1}]}"#)
            .expect("parse");
        let err = file.into_graph(None).expect_err("bad edge");
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let file = GraphFile::from_json(r#"{"n": 2, "source": 2}"#).expect("parse");
        assert!(file.into_graph(None).is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(GraphFile::from_json("{not json").is_err());
    }
}
