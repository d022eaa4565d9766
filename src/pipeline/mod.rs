//! The `generate` pipeline: decals, then entities, then tiles.
//!
//! Each stage loads its cache from `<output>/.data/<stage>.json`, renders its
//! images under `<output>/.images/<stage>/`, registers ids that are not yet
//! cached and rewrites both the cache and `<output>/<stage>.tsx`.

mod decals;
mod entities;
mod stage;
mod tiles;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::ThreadPool;

use crate::error::{Result, TiledError};

pub use decals::{decal_variants, Variant};
pub use stage::{Produced, StageReport};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "dist";

/// Default size of the worker pool for the decal and tile stages.
pub const DEFAULT_WORKERS: usize = 4;

/// Options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub output: PathBuf,
    pub workers: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            workers: DEFAULT_WORKERS,
        }
    }
}

/// What a run produced, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub stages: Vec<StageReport>,
}

impl GenerateReport {
    /// Images written across all stages.
    pub fn images_written(&self) -> usize {
        self.stages.iter().map(|s| s.written).sum()
    }

    /// Ids newly registered across all stages.
    pub fn ids_added(&self) -> usize {
        self.stages.iter().map(|s| s.added).sum()
    }

    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.name == name)
    }
}

/// Resolved input and output directories for a run.
#[derive(Debug, Clone)]
pub struct Layout {
    pub resources: PathBuf,
    pub prototypes: PathBuf,
    pub textures: PathBuf,
    pub output: PathBuf,
}

impl Layout {
    /// Check that `root` looks like a game repository.
    pub fn new(root: &Path, output: &Path) -> Result<Self> {
        let resources = root.join("Resources");
        let layout = Self {
            prototypes: resources.join("Prototypes"),
            textures: resources.join("Textures"),
            resources,
            output: output.to_path_buf(),
        };

        for dir in [&layout.prototypes, &layout.textures] {
            if !dir.is_dir() {
                return Err(TiledError::Validation {
                    message: format!("'{}' is not a directory", dir.display()),
                    help: Some(format!(
                        "'{}' should be the root of a game repository, containing Resources/Prototypes and Resources/Textures",
                        root.display()
                    )),
                });
            }
        }
        Ok(layout)
    }

    /// Create the output tree (`.data` and `.images`).
    pub fn prepare_output(&self) -> Result<()> {
        for dir in [self.data_dir(), self.images_dir()] {
            fs::create_dir_all(&dir).map_err(|e| TiledError::io(&dir, e))?;
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.output.join(".data")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.output.join(".images")
    }

    pub fn cache_path(&self, stage: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", stage))
    }

    pub fn image_dir(&self, stage: &str) -> PathBuf {
        self.images_dir().join(stage)
    }

    pub fn tsx_path(&self, stage: &str) -> PathBuf {
        self.output.join(format!("{}.tsx", stage))
    }
}

/// Generate every tileset for the repository at `root`.
///
/// `progress` is called with `(current, 100)` before the first stage and
/// after each one. `output` defaults to [`DEFAULT_OUTPUT`].
pub fn generate(
    root: &Path,
    progress: Option<&mut dyn FnMut(u32, u32)>,
    output: Option<&Path>,
) -> Result<GenerateReport> {
    let mut options = GenerateOptions::default();
    if let Some(output) = output {
        options.output = output.to_path_buf();
    }
    generate_with(root, &options, progress)
}

/// Generate every tileset with explicit options.
pub fn generate_with(
    root: &Path,
    options: &GenerateOptions,
    mut progress: Option<&mut dyn FnMut(u32, u32)>,
) -> Result<GenerateReport> {
    let layout = Layout::new(root, &options.output)?;
    layout.prepare_output()?;
    let pool = build_thread_pool(options.workers)?;

    let mut report_progress = |current: u32| {
        if let Some(callback) = progress.as_mut() {
            callback(current, 100);
        }
    };

    let mut report = GenerateReport::default();
    report_progress(0);

    report.stages.extend(decals::run(&layout, &pool)?);
    report_progress(33);

    report.stages.extend(entities::run(&layout)?);
    report_progress(66);

    report.stages.push(tiles::run(&layout, &pool)?);
    report_progress(100);

    tracing::info!(
        images = report.images_written(),
        added = report.ids_added(),
        "generation finished"
    );
    Ok(report)
}

fn build_thread_pool(workers: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| TiledError::Build {
            message: format!("failed to build worker pool: {}", e),
            help: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_layout_requires_resources() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Resources/Prototypes")).unwrap();

        let err = Layout::new(dir.path(), Path::new("dist")).unwrap_err();
        assert!(matches!(err, TiledError::Validation { .. }));

        fs::create_dir_all(dir.path().join("Resources/Textures")).unwrap();
        assert!(Layout::new(dir.path(), Path::new("dist")).is_ok());
    }

    #[test]
    fn test_layout_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Resources/Prototypes")).unwrap();
        fs::create_dir_all(dir.path().join("Resources/Textures")).unwrap();
        let out = dir.path().join("out");

        let layout = Layout::new(dir.path(), &out).unwrap();
        layout.prepare_output().unwrap();

        assert!(out.join(".data").is_dir());
        assert!(out.join(".images").is_dir());
        assert_eq!(layout.cache_path("tiles"), out.join(".data/tiles.json"));
        assert_eq!(layout.image_dir("decals"), out.join(".images/decals"));
        assert_eq!(layout.tsx_path("entities_Other"), out.join("entities_Other.tsx"));
    }

    #[test]
    fn test_progress_on_empty_repository() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Resources/Prototypes")).unwrap();
        fs::create_dir_all(dir.path().join("Resources/Textures")).unwrap();
        let out = dir.path().join("dist");

        let mut seen = Vec::new();
        let mut callback = |current: u32, total: u32| seen.push((current, total));
        let report = generate(dir.path(), Some(&mut callback), Some(&out)).unwrap();

        assert_eq!(seen, vec![(0, 100), (33, 100), (66, 100), (100, 100)]);
        assert_eq!(report.ids_added(), 0);
        assert!(out.join("tiles.tsx").is_file());
        assert!(out.join("decals.tsx").is_file());
        assert!(out.join("entities_Other.tsx").is_file());
    }

    #[test]
    fn test_missing_root_fails_before_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("dist");
        assert!(generate(dir.path(), None, Some(&out)).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_default_options() {
        let options = GenerateOptions::default();
        assert_eq!(options.output, PathBuf::from("dist"));
        assert_eq!(options.workers, 4);
    }
}
