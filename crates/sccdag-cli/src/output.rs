//! Output layer for pretty/text/JSON rendering of analysis results.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` flag
//! 2. `SCCDAG_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `[output] format` in the config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! JSON mode writes one compact object per input file, one per line.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use sccdag_core::{AnalysisReport, PathEntry};
use serde::Serialize;

use crate::generate::GeneratedDataset;

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output with sections and framing.
    Pretty,
    /// Plain `key=value` lines for scripts and pipes.
    Text,
    /// One JSON object per input file.
    Json,
}

impl OutputMode {
    /// Parse a mode name case-insensitively; unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    format_env: Option<&str>,
    config_mode: Option<OutputMode>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if let Some(mode) = format_env.and_then(OutputMode::parse) {
        return mode;
    }

    if let Some(mode) = config_mode {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from the flag, `SCCDAG_FORMAT`, config and TTY.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    config_mode: Option<OutputMode>,
) -> OutputMode {
    let env_val = std::env::var("SCCDAG_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, env_val.as_deref(), config_mode, is_tty)
}

// ---------------------------------------------------------------------------
// Analysis reports
// ---------------------------------------------------------------------------

/// JSON view of one analyzed file.
#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    file: String,
    #[serde(flatten)]
    report: &'a AnalysisReport,
    shortest_paths: Vec<PathEntry>,
    longest_paths: Vec<PathEntry>,
    critical_path_nodes: Vec<usize>,
}

impl<'a> ReportView<'a> {
    #[must_use]
    pub fn new(file: &Path, report: &'a AnalysisReport) -> Self {
        Self {
            file: file.display().to_string(),
            report,
            shortest_paths: report.shortest_paths(),
            longest_paths: report.longest_paths(),
            critical_path_nodes: report.expand_path(report.critical_path()),
        }
    }
}

/// Join ids with `sep`.
#[must_use]
pub fn join(ids: &[usize], sep: &str) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

fn component_path(path: &[usize]) -> String {
    path.iter()
        .map(|c| format!("C{c}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn length(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Render one analysis report in the requested mode.
pub fn render_report(
    w: &mut dyn Write,
    mode: OutputMode,
    file: &Path,
    report: &AnalysisReport,
    timing: bool,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer(&mut *w, &ReportView::new(file, report))?;
            writeln!(w)?;
        }
        OutputMode::Text => render_report_text(w, file, report, timing)?,
        OutputMode::Pretty => render_report_pretty(w, file, report, timing)?,
    }
    Ok(())
}

fn render_report_text(
    w: &mut dyn Write,
    file: &Path,
    report: &AnalysisReport,
    timing: bool,
) -> io::Result<()> {
    let s = &report.summary;
    writeln!(
        w,
        "file={} nodes={} edges={} source={} sccs={} cyclic={} dag_edges={} critical_length={}",
        file.display(),
        s.node_count,
        s.edge_count,
        s.source,
        s.scc_count,
        s.cycle_count,
        s.condensation_edges,
        length(s.critical_path_length),
    )?;
    let components = report.components.components().iter();
    for (cid, (component, &cyclic)) in components.zip(&report.cycle_flags).enumerate() {
        let marker = if cyclic { " cycle" } else { "" };
        writeln!(w, "component {cid}: {}{marker}", join(component.nodes(), " "))?;
    }
    writeln!(w, "order: {}", join(&report.topological_order, " "))?;
    for entry in report.shortest_paths() {
        writeln!(
            w,
            "shortest {} {} {}",
            entry.target,
            entry.distance,
            join(&entry.path, ">")
        )?;
    }
    for entry in report.longest_paths() {
        writeln!(
            w,
            "longest {} {} {}",
            entry.target,
            entry.distance,
            join(&entry.path, ">")
        )?;
    }
    writeln!(
        w,
        "critical: {}",
        join(&report.expand_path(report.critical_path()), " ")
    )?;
    if timing {
        writeln!(
            w,
            "operations={} elapsed_ns={}",
            s.operations, s.elapsed_nanos
        )?;
    }
    Ok(())
}

fn render_report_pretty(
    w: &mut dyn Write,
    file: &Path,
    report: &AnalysisReport,
    timing: bool,
) -> io::Result<()> {
    let s = &report.summary;
    pretty_section(w, &format!("Graph {}", file.display()))?;
    pretty_kv(w, "nodes", s.node_count.to_string())?;
    pretty_kv(w, "edges", s.edge_count.to_string())?;
    pretty_kv(w, "density", format!("{:.4}", s.density))?;
    pretty_kv(w, "source", s.source.to_string())?;
    if let Some(model) = &s.weight_model {
        pretty_kv(w, "weight model", model)?;
    }
    pretty_kv(
        w,
        "sccs",
        format!(
            "{} ({} cyclic, largest {}, avg {:.2})",
            s.scc_count, s.cycle_count, s.largest_scc, s.average_scc_size
        ),
    )?;
    pretty_kv(
        w,
        "condensation",
        format!(
            "{} nodes, {} edges",
            s.condensation_nodes, s.condensation_edges
        ),
    )?;
    pretty_kv(w, "order", component_path(&report.topological_order))?;
    writeln!(w)?;

    pretty_section(w, "Components")?;
    let components = report.components.components().iter();
    for (cid, (component, &cyclic)) in components.zip(&report.cycle_flags).enumerate() {
        let marker = if cyclic { " (cycle)" } else { "" };
        writeln!(w, "  C{cid:<5} [{}]{marker}", join(component.nodes(), ", "))?;
    }
    writeln!(w)?;

    pretty_paths(
        w,
        &format!("Shortest paths from C{}", report.source_component),
        &report.shortest_paths(),
    )?;
    pretty_paths(
        w,
        &format!("Longest paths from C{}", report.source_component),
        &report.longest_paths(),
    )?;

    pretty_section(w, "Critical path")?;
    pretty_kv(w, "length", length(s.critical_path_length))?;
    pretty_kv(w, "components", component_path(report.critical_path()))?;
    pretty_kv(
        w,
        "nodes",
        join(&report.expand_path(report.critical_path()), " -> "),
    )?;

    if timing {
        writeln!(w)?;
        pretty_section(w, "Timing")?;
        pretty_kv(w, "operations", s.operations.to_string())?;
        pretty_kv(w, "elapsed", format!("{} ns", s.elapsed_nanos))?;
    }
    writeln!(w)?;
    Ok(())
}

fn pretty_paths(w: &mut dyn Write, heading: &str, entries: &[PathEntry]) -> io::Result<()> {
    pretty_section(w, heading)?;
    for entry in entries {
        let star = if entry.is_critical { " *" } else { "" };
        writeln!(
            w,
            "  C{:<5} {:>8}  {}{star}",
            entry.target,
            entry.distance,
            component_path(&entry.path)
        )?;
    }
    writeln!(w)
}

// ---------------------------------------------------------------------------
// Check results
// ---------------------------------------------------------------------------

/// Outcome of validating one input file.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub file: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Render one check outcome in the requested mode.
pub fn render_check(w: &mut dyn Write, mode: OutputMode, outcome: &CheckOutcome) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer(&mut *w, outcome)?;
            writeln!(w)?;
        }
        OutputMode::Text => match (&outcome.error, outcome.nodes, outcome.edges) {
            (None, Some(nodes), Some(edges)) => {
                writeln!(w, "ok {} nodes={nodes} edges={edges}", outcome.file)?;
            }
            (error, _, _) => {
                writeln!(
                    w,
                    "invalid {} {}",
                    outcome.file,
                    error.as_deref().unwrap_or_default()
                )?;
            }
        },
        OutputMode::Pretty => {
            if outcome.valid {
                writeln!(
                    w,
                    "✓ {}  ({} nodes, {} edges)",
                    outcome.file,
                    outcome.nodes.unwrap_or_default(),
                    outcome.edges.unwrap_or_default()
                )?;
            } else {
                writeln!(
                    w,
                    "✗ {}  {}",
                    outcome.file,
                    outcome.error.as_deref().unwrap_or_default()
                )?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Generated datasets
// ---------------------------------------------------------------------------

/// Render one generated dataset in the requested mode.
pub fn render_generated(
    w: &mut dyn Write,
    mode: OutputMode,
    dataset: &GeneratedDataset,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer(&mut *w, dataset)?;
            writeln!(w)?;
        }
        OutputMode::Text => writeln!(
            w,
            "generated {} nodes={} edges={} shape={}",
            dataset.file,
            dataset.nodes,
            dataset.edges,
            dataset.shape.as_str()
        )?,
        OutputMode::Pretty => writeln!(
            w,
            "✓ {}  ({} nodes, {} edges, {})",
            dataset.file,
            dataset.nodes,
            dataset.edges,
            dataset.shape.as_str()
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sccdag_core::graph::Graph;
    use sccdag_core::{NoopMetrics, analyze};

    fn chain_report() -> AnalysisReport {
        let graph = Graph::from_triples(3, &[(0, 1, 5), (1, 2, 3)]).expect("graph");
        analyze(&graph, &mut NoopMetrics).expect("analyze")
    }

    fn render(mode: OutputMode, report: &AnalysisReport, timing: bool) -> String {
        let mut buf = Vec::new();
        render_report(&mut buf, mode, Path::new("chain.json"), report, timing).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    fn render_to_string(mode: OutputMode, timing: bool) -> String {
        render(mode, &chain_report(), timing)
    }

    /// 0 → 1 → 2 → 0 plus a self-loop on 3.
    fn triangle_and_loop_report() -> AnalysisReport {
        let graph = Graph::from_triples(4, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (3, 3, 1)])
            .expect("graph");
        analyze(&graph, &mut NoopMetrics).expect("analyze")
    }

    #[test]
    fn flag_beats_env_and_config() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            Some("json"),
            Some(OutputMode::Pretty),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn env_beats_config() {
        let mode = resolve_output_mode_inner(None, Some("JSON"), Some(OutputMode::Text), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn unknown_env_falls_through_to_config() {
        let mode = resolve_output_mode_inner(None, Some("yaml"), Some(OutputMode::Json), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn tty_default_is_pretty_and_pipe_default_is_text() {
        assert_eq!(
            resolve_output_mode_inner(None, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, None, None, false),
            OutputMode::Text
        );
    }

    #[test]
    fn text_report_lists_critical_nodes() {
        let out = render_to_string(OutputMode::Text, false);
        assert!(out.starts_with("file=chain.json nodes=3 edges=2"));
        assert!(out.contains("critical_length=8"));
        assert!(out.contains("critical: 0 1 2"));
        assert!(!out.contains("operations="));
    }

    #[test]
    fn timing_adds_operation_line() {
        let out = render_to_string(OutputMode::Text, true);
        assert!(out.contains("operations=0"));
    }

    #[test]
    fn json_report_is_one_line() {
        let out = render_to_string(OutputMode::Json, false);
        assert_eq!(out.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["file"], "chain.json");
        assert_eq!(value["summary"]["critical_path_length"], 8);
        assert_eq!(value["critical_path_nodes"], serde_json::json!([0, 1, 2]));
    }

    #[test]
    fn pretty_report_has_sections() {
        let out = render_to_string(OutputMode::Pretty, true);
        assert!(out.contains("Graph chain.json"));
        assert!(out.contains("Critical path"));
        assert!(out.contains("Timing"));
    }

    #[test]
    fn self_loop_singleton_is_marked_as_cycle() {
        let report = triangle_and_loop_report();
        assert_eq!(report.summary.cycle_count, 2);

        let pretty = render(OutputMode::Pretty, &report, false);
        assert_eq!(pretty.matches("(cycle)").count(), 2);

        let text = render(OutputMode::Text, &report, false);
        let cyclic_lines = text
            .lines()
            .filter(|l| l.starts_with("component ") && l.ends_with(" cycle"))
            .count();
        assert_eq!(cyclic_lines, 2);

        let json: serde_json::Value =
            serde_json::from_str(&render(OutputMode::Json, &report, false)).expect("json");
        assert_eq!(json["cycle_flags"], serde_json::json!([true, true]));
    }

    #[test]
    fn acyclic_components_are_unmarked() {
        let pretty = render_to_string(OutputMode::Pretty, false);
        assert!(!pretty.contains("(cycle)"));
        let text = render_to_string(OutputMode::Text, false);
        assert!(text.contains("component 0: 2\n"));
    }

    #[test]
    fn generated_text_output() {
        let dataset = GeneratedDataset {
            file: "data/small_dag.json".to_string(),
            nodes: 10,
            edges: 15,
            shape: crate::generate::Shape::Acyclic,
        };
        let mut buf = Vec::new();
        render_generated(&mut buf, OutputMode::Text, &dataset).expect("render");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "generated data/small_dag.json nodes=10 edges=15 shape=acyclic\n"
        );
    }

    #[test]
    fn check_text_output() {
        let mut buf = Vec::new();
        let outcome = CheckOutcome {
            file: "g.json".to_string(),
            valid: false,
            nodes: None,
            edges: None,
            error: Some("boom".to_string()),
        };
        render_check(&mut buf, OutputMode::Text, &outcome).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "invalid g.json boom\n");
    }
}
