//! CSV and JSON export of analysis reports.
//!
//! For an input `data/small_dag.json` exported under `out`:
//!
//! ```text
//! out/csv/small_dag_components.csv   component_id,size,node_list,is_cycle
//! out/csv/small_dag_metrics.csv      metric,value,description
//! out/csv/small_dag_paths.csv        path_type,target_node,distance,path,is_critical
//! out/json/small_dag_full.json       pretty-printed JSON report
//! ```
//!
//! Paths are written over component ids joined with `" -> "`. The first
//! paths row is the critical path, with `target_node` set to `-1`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sccdag_core::AnalysisReport;
use serde::Serialize;
use tracing::debug;

use crate::output::{ReportView, join};

const PATH_SEP: &str = " -> ";

/// Files written by [`export_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub components: PathBuf,
    pub metrics: PathBuf,
    pub paths: PathBuf,
    pub full: PathBuf,
}

impl ExportedFiles {
    fn under(out_dir: &Path, name: &str) -> Self {
        let csv_dir = out_dir.join("csv");
        let json_dir = out_dir.join("json");
        Self {
            components: csv_dir.join(format!("{name}_components.csv")),
            metrics: csv_dir.join(format!("{name}_metrics.csv")),
            paths: csv_dir.join(format!("{name}_paths.csv")),
            full: json_dir.join(format!("{name}_full.json")),
        }
    }
}

#[derive(Debug, Serialize)]
struct ComponentRow {
    component_id: usize,
    size: usize,
    node_list: String,
    is_cycle: bool,
}

#[derive(Debug, Serialize)]
struct MetricRow {
    metric: &'static str,
    value: String,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct PathRow {
    path_type: &'static str,
    target_node: i64,
    distance: i64,
    path: String,
    is_critical: bool,
}

/// Write the CSV tables and the full JSON report for `input` under `out_dir`.
///
/// The file names are derived from the input's file stem.
pub fn export_report(out_dir: &Path, input: &Path, report: &AnalysisReport) -> Result<ExportedFiles> {
    let name = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("graph");
    let files = ExportedFiles::under(out_dir, name);

    for dir in [out_dir.join("csv"), out_dir.join("json")] {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    write_rows(&files.components, component_rows(report))?;
    write_rows(&files.metrics, metric_rows(report))?;
    write_rows(&files.paths, path_rows(report)?)?;

    let file = File::create(&files.full)
        .with_context(|| format!("Failed to create {}", files.full.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ReportView::new(input, report))
        .with_context(|| format!("Failed to write {}", files.full.display()))?;
    writeln!(writer)?;
    writer.flush()?;

    debug!(out_dir = %out_dir.display(), name, "report exported");
    Ok(files)
}

fn write_rows<T: Serialize>(path: &Path, rows: Vec<T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

fn component_rows(report: &AnalysisReport) -> Vec<ComponentRow> {
    report
        .components
        .components()
        .iter()
        .zip(&report.cycle_flags)
        .enumerate()
        .map(|(cid, (component, &is_cycle))| ComponentRow {
            component_id: cid,
            size: component.len(),
            node_list: format!("[{}]", join(component.nodes(), ", ")),
            is_cycle,
        })
        .collect()
}

fn metric_rows(report: &AnalysisReport) -> Vec<MetricRow> {
    let s = &report.summary;
    let row = |metric: &'static str, value: String, description: &'static str| MetricRow {
        metric,
        value,
        description,
    };

    vec![
        row("nodes", s.node_count.to_string(), "Number of nodes"),
        row("edges", s.edge_count.to_string(), "Number of edges"),
        row("density", format!("{:.4}", s.density), "Edges over possible edges"),
        row("source", s.source.to_string(), "Source node"),
        row(
            "weight_model",
            s.weight_model.clone().unwrap_or_default(),
            "Weight model",
        ),
        row(
            "scc_count",
            s.scc_count.to_string(),
            "Number of strongly connected components",
        ),
        row(
            "cycle_count",
            s.cycle_count.to_string(),
            "Components that contain a cycle",
        ),
        row("largest_scc", s.largest_scc.to_string(), "Size of the largest SCC"),
        row(
            "smallest_scc",
            s.smallest_scc.to_string(),
            "Size of the smallest SCC",
        ),
        row(
            "avg_scc_size",
            format!("{:.2}", s.average_scc_size),
            "Average SCC size",
        ),
        row(
            "condensation_nodes",
            s.condensation_nodes.to_string(),
            "Nodes in the condensation DAG",
        ),
        row(
            "condensation_edges",
            s.condensation_edges.to_string(),
            "Edges in the condensation DAG",
        ),
        row(
            "critical_path_length",
            s.critical_path_length
                .map_or_else(String::new, |v| v.to_string()),
            "Weight of the critical path",
        ),
        row(
            "operations_count",
            s.operations.to_string(),
            "Operations counted during analysis",
        ),
        row(
            "execution_time_ns",
            s.elapsed_nanos.to_string(),
            "Elapsed analysis time in nanoseconds",
        ),
        row(
            "topological_order",
            join(&report.topological_order, PATH_SEP),
            "Topological order of components",
        ),
        row(
            "critical_path_nodes",
            join(&report.expand_path(report.critical_path()), PATH_SEP),
            "Original nodes on the critical path",
        ),
    ]
}

fn path_rows(report: &AnalysisReport) -> Result<Vec<PathRow>> {
    let mut rows = vec![PathRow {
        path_type: "critical_path",
        target_node: -1,
        distance: report.critical_path_length().unwrap_or_default(),
        path: join(report.critical_path(), PATH_SEP),
        is_critical: true,
    }];

    for (path_type, entries) in [
        ("shortest_path", report.shortest_paths()),
        ("longest_path", report.longest_paths()),
    ] {
        for entry in entries {
            rows.push(PathRow {
                path_type,
                target_node: i64::try_from(entry.target)
                    .context("component id does not fit in i64")?,
                distance: entry.distance,
                path: join(&entry.path, PATH_SEP),
                is_critical: entry.is_critical,
            });
        }
    }
    Ok(rows)
}
