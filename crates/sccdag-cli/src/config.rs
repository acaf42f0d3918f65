use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::output::OutputMode;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "sccdag.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Overrides the source node of every input graph.
    #[serde(default)]
    pub source: Option<usize>,
    #[serde(default)]
    pub timing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<String>,
    /// Export directory used when `--out-dir` is absent.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Output mode named in the config file, if it is a known value.
    pub fn output_mode(&self) -> Option<OutputMode> {
        self.output.format.as_deref().and_then(OutputMode::parse)
    }
}

/// Load `explicit` if given, else `./sccdag.toml` under `cwd` if present,
/// else defaults.
///
/// An explicit path that does not exist is an error; a missing default file
/// is not.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<CliConfig> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !candidate.exists() {
                return Ok(CliConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = toml::from_str::<CliConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}
