#![forbid(unsafe_code)]

mod config;
mod export;
mod generate;
mod input;
mod output;

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::{CheckOutcome, OutputMode};
use sccdag_core::{Metrics, NoopMetrics, OperationCounter, analyze};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sccdag: strongly connected components and critical paths for weighted digraphs",
    long_about = None
)]
struct Cli {
    /// Config file (defaults to ./sccdag.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyze graph files",
        long_about = "Run SCC detection, condensation, topological sort and DAG path \
                      analysis on each JSON graph file.",
        after_help = "EXAMPLES:\n    # Analyze one graph\n    sccdag analyze data/small_dag.json\n\n    # Start paths from node 3 and report operation counts\n    sccdag analyze data/*.json --source 3 --timing\n\n    # Emit machine-readable output\n    sccdag analyze data/small_dag.json --format json"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Validate graph files",
        long_about = "Parse each JSON graph file and range-check its ids without analyzing it.",
        after_help = "EXAMPLES:\n    # Validate every dataset\n    sccdag check data/*.json"
    )]
    Check(CheckArgs),

    #[command(
        about = "Generate sample datasets",
        long_about = "Write the nine seeded sample graphs (cyclic, acyclic, mixed, sparse and \
                      dense, 8 to 50 nodes) as JSON graph files.",
        after_help = "EXAMPLES:\n    # Write the default datasets\n    sccdag generate data\n\n    # Use another seed\n    sccdag generate data --seed 7"
    )]
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// Graph files to analyze.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Override the source node of every graph.
    #[arg(long, value_name = "ID")]
    source: Option<usize>,

    /// Count operations and measure elapsed time.
    #[arg(long)]
    timing: bool,

    /// Also write CSV tables and a full JSON report under this directory.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Graph files to validate.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Directory to write the datasets into.
    dir: PathBuf,

    /// RNG seed.
    #[arg(long, default_value_t = generate::DEFAULT_SEED)]
    seed: u64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCCDAG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "sccdag=debug,info"
        } else {
            "sccdag=info,warn"
        })
    });

    let format = env::var("SCCDAG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

/// Analyze one file and write its report, exporting it when `out_dir` is set.
fn analyze_file(
    out: &mut dyn Write,
    path: &Path,
    source: Option<usize>,
    timing: bool,
    out_dir: Option<&Path>,
    mode: OutputMode,
) -> Result<()> {
    let graph = input::load_graph(path, source)?;

    let mut counter = OperationCounter::new();
    let mut noop = NoopMetrics;
    let metrics: &mut dyn Metrics = if timing { &mut counter } else { &mut noop };
    let report =
        analyze(&graph, metrics).with_context(|| format!("Failed to analyze {}", path.display()))?;

    if let Some(dir) = out_dir {
        let files = export::export_report(dir, path, &report)?;
        info!(
            file = %path.display(),
            components = %files.components.display(),
            metrics = %files.metrics.display(),
            paths = %files.paths.display(),
            full = %files.full.display(),
            "report exported"
        );
    }

    output::render_report(out, mode, path, &report, timing)
}

fn run_analyze(args: &AnalyzeArgs, cfg: &config::CliConfig, mode: OutputMode) -> Result<usize> {
    let source = args.source.or(cfg.analysis.source);
    let timing = args.timing || cfg.analysis.timing;
    let out_dir = args.out_dir.as_deref().or(cfg.output.out_dir.as_deref());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut failures = 0;
    for path in &args.files {
        if let Err(err) = analyze_file(&mut out, path, source, timing, out_dir, mode) {
            error!(file = %path.display(), "{err:#}");
            failures += 1;
        }
    }
    out.flush()?;
    Ok(failures)
}

fn run_check(args: &CheckArgs, mode: OutputMode) -> Result<usize> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut failures = 0;
    for path in &args.files {
        let outcome = match input::load_graph(path, None) {
            Ok(graph) => CheckOutcome {
                file: path.display().to_string(),
                valid: true,
                nodes: Some(graph.node_count()),
                edges: Some(graph.edge_count()),
                error: None,
            },
            Err(err) => {
                failures += 1;
                CheckOutcome {
                    file: path.display().to_string(),
                    valid: false,
                    nodes: None,
                    edges: None,
                    error: Some(format!("{err:#}")),
                }
            }
        };
        output::render_check(&mut out, mode, &outcome)?;
    }
    out.flush()?;
    Ok(failures)
}

fn run_generate(args: &GenerateArgs, mode: OutputMode) -> Result<usize> {
    let written = generate::write_datasets(&args.dir, args.seed)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for dataset in &written {
        output::render_generated(&mut out, mode, dataset)?;
    }
    out.flush()?;
    Ok(0)
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let cwd = env::current_dir()?;
    let cfg = config::load_config(cli.config.as_deref(), &cwd)?;
    let mode = output::resolve_output_mode(cli.format, cfg.output_mode());

    let (command, total, failures) = match &cli.command {
        Commands::Analyze(args) => ("analyze", args.files.len(), run_analyze(args, &cfg, mode)?),
        Commands::Check(args) => ("check", args.files.len(), run_check(args, mode)?),
        Commands::Generate(args) => (
            "generate",
            generate::DATASETS.len(),
            run_generate(args, mode)?,
        ),
    };

    info!(command, total, failures, "run complete");
    if failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
