//! Optional `ss14-tiled.yaml` configuration.
//!
//! Every setting has a default, so the file may be absent or partial.
//! Command-line flags override whatever it sets.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TiledError};
use crate::pipeline::{GenerateOptions, DEFAULT_OUTPUT, DEFAULT_WORKERS};

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILENAME: &str = "ss14-tiled.yaml";

/// Settings loaded from `ss14-tiled.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output directory for tilesets, caches and images.
    pub output: PathBuf,

    /// Worker threads for the decal and tile stages.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TiledError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content).map_err(|e| TiledError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax; known keys are output and workers", CONFIG_FILENAME)),
        })?;

        if config.workers == 0 {
            return Err(TiledError::Validation {
                message: "workers must be at least 1".to_string(),
                help: None,
            });
        }
        Ok(config)
    }

    /// Load `path` if given, else `ss14-tiled.yaml` in `dir` if present,
    /// else the defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Pipeline options, with explicit overrides taking precedence.
    pub fn options(&self, output: Option<PathBuf>, workers: Option<usize>) -> GenerateOptions {
        GenerateOptions {
            output: output.unwrap_or_else(|| self.output.clone()),
            workers: workers.unwrap_or(self.workers),
        }
    }
}
