//! Seeded generation of the sample datasets.
//!
//! Every dataset uses source 0, the `"edge"` weight model and weights drawn
//! uniformly from `1..=10`. A `(u, v)` pair is never emitted twice. One RNG
//! is shared across the datasets in [`DATASETS`] order, so a seed fixes the
//! whole set.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::input::{EdgeRecord, GraphFile};

pub const DEFAULT_SEED: u64 = 42;

const MAX_WEIGHT: i64 = 10;

/// Random draws allowed per requested edge before the fill gives up.
const ATTEMPTS_PER_EDGE: usize = 100;

/// Overall structure of a generated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Random spanning tree plus forward edges `u < v`.
    Acyclic,
    /// Ring through every node plus random edges.
    Cyclic,
    /// Acyclic half, a few short cycles, then random edges.
    Mixed,
    /// Acyclic with at most `2n` edges.
    Sparse,
    /// Every ordered pair `u != v` in id order until the target.
    Dense,
}

impl Shape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acyclic => "acyclic",
            Self::Cyclic => "cyclic",
            Self::Mixed => "mixed",
            Self::Sparse => "sparse",
            Self::Dense => "dense",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub nodes: usize,
    pub target_edges: usize,
    pub shape: Shape,
}

const fn spec(name: &'static str, nodes: usize, target_edges: usize, shape: Shape) -> DatasetSpec {
    DatasetSpec {
        name,
        nodes,
        target_edges,
        shape,
    }
}

pub const DATASETS: [DatasetSpec; 9] = [
    spec("small_cycle", 8, 12, Shape::Cyclic),
    spec("small_dag", 10, 15, Shape::Acyclic),
    spec("small_mixed", 9, 14, Shape::Mixed),
    spec("medium_complex_dag", 15, 25, Shape::Acyclic),
    spec("medium_mixed", 18, 30, Shape::Mixed),
    spec("medium_multiple_scc", 20, 35, Shape::Cyclic),
    spec("large_sparse", 30, 45, Shape::Sparse),
    spec("large_medium", 40, 80, Shape::Mixed),
    spec("large_complex_scc", 50, 120, Shape::Dense),
];

/// One file written by [`write_datasets`].
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDataset {
    pub file: String,
    pub nodes: usize,
    pub edges: usize,
    pub shape: Shape,
}

#[derive(Default)]
struct EdgeSet {
    seen: HashSet<(usize, usize)>,
    edges: Vec<EdgeRecord>,
}

impl EdgeSet {
    fn add(&mut self, rng: &mut StdRng, u: usize, v: usize) {
        if self.seen.insert((u, v)) {
            let w = rng.gen_range(1..=MAX_WEIGHT);
            self.edges.push(EdgeRecord { u, v, w });
        }
    }

    fn len(&self) -> usize {
        self.edges.len()
    }

    /// Add edges from `draw` until `target` is reached or the attempts run out.
    fn fill(
        &mut self,
        rng: &mut StdRng,
        target: usize,
        mut draw: impl FnMut(&mut StdRng) -> (usize, usize),
    ) {
        let max_attempts = target.saturating_mul(ATTEMPTS_PER_EDGE);
        let mut attempts = 0;
        while self.len() < target && attempts < max_attempts {
            let (u, v) = draw(rng);
            self.add(rng, u, v);
            attempts += 1;
        }
    }

    fn fill_forward(&mut self, rng: &mut StdRng, n: usize, target: usize) {
        if n < 2 {
            return;
        }
        for i in 1..n {
            let u = rng.gen_range(0..i);
            self.add(rng, u, i);
        }
        self.fill(rng, target, |rng| {
            let u = rng.gen_range(0..n - 1);
            (u, rng.gen_range(u + 1..n))
        });
    }

    fn fill_random(&mut self, rng: &mut StdRng, n: usize, target: usize) {
        if n == 0 {
            return;
        }
        self.fill(rng, target, |rng| (rng.gen_range(0..n), rng.gen_range(0..n)));
    }
}

/// Generate one dataset, advancing `rng`.
#[must_use]
pub fn generate(spec: &DatasetSpec, rng: &mut StdRng) -> GraphFile {
    let n = spec.nodes;
    let target = spec.target_edges;
    let mut set = EdgeSet::default();

    match spec.shape {
        Shape::Acyclic => set.fill_forward(rng, n, target),
        Shape::Sparse => set.fill_forward(rng, n, target.min(2 * n)),
        Shape::Cyclic => {
            for i in 0..n {
                set.add(rng, i, (i + 1) % n);
            }
            set.fill_random(rng, n, target);
        }
        Shape::Mixed => {
            set.fill_forward(rng, n, target / 2);
            if n > 0 {
                for _ in 0..(n / 5).max(1) {
                    let size = rng.gen_range(3..=5).min(n);
                    let members: Vec<usize> = (0..size).map(|_| rng.gen_range(0..n)).collect();
                    for (j, &u) in members.iter().enumerate() {
                        set.add(rng, u, members[(j + 1) % size]);
                    }
                }
            }
            set.fill_random(rng, n, target);
        }
        Shape::Dense => {
            'pairs: for u in 0..n {
                for v in (0..n).filter(|&v| v != u) {
                    if set.len() >= target {
                        break 'pairs;
                    }
                    set.add(rng, u, v);
                }
            }
        }
    }

    debug!(
        name = spec.name,
        nodes = n,
        edges = set.len(),
        shape = spec.shape.as_str(),
        "dataset generated"
    );
    GraphFile {
        n,
        edges: set.edges,
        source: 0,
        weight_model: Some("edge".to_string()),
    }
}

/// Write every dataset in [`DATASETS`] to `<dir>/<name>.json`.
#[instrument(skip_all, fields(dir = %dir.display(), seed = seed))]
pub fn write_datasets(dir: &Path, seed: u64) -> Result<Vec<GeneratedDataset>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut written = Vec::with_capacity(DATASETS.len());
    for spec in &DATASETS {
        let graph = generate(spec, &mut rng);
        let path = dir.join(format!("{}.json", spec.name));

        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &graph)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        writeln!(writer)?;
        writer.flush()?;

        written.push(GeneratedDataset {
            file: path.display().to_string(),
            nodes: graph.n,
            edges: graph.edges.len(),
            shape: spec.shape,
        });
    }
    info!(count = written.len(), "datasets written");
    Ok(written)
}
