//! Generate command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::{Result, TiledError};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::generate_with;

/// Generate decal, entity and tile tilesets
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Root of the game repository (contains Resources/)
    pub root: PathBuf,

    /// Output directory [default: dist]
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Worker threads for decals and tiles [default: 4]
    #[arg(long)]
    pub workers: Option<usize>,

    /// Config file [default: ./ss14-tiled.yaml if present]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::discover(args.config.as_deref(), &cwd)?;
    let options = config.options(args.output, args.workers);
    if options.workers == 0 {
        return Err(TiledError::Validation {
            message: "--workers must be at least 1".to_string(),
            help: None,
        });
    }

    printer.status(
        "Generating",
        &format!(
            "{} -> {}",
            display_path(&args.root),
            printer.cyan(&display_path(&options.output))
        ),
    );

    let mut progress = |current: u32, total: u32| {
        printer.info("Progress", &format!("{}/{}", current, total));
    };
    let report = generate_with(&args.root, &options, Some(&mut progress))?;

    for stage in &report.stages {
        if stage.skipped > 0 {
            printer.warning(
                "Skipped",
                &format!("{} in {}", plural(stage.skipped, "item", "items"), stage.name),
            );
        }
        printer.status(
            "Wrote",
            &format!(
                "{}.tsx {}",
                stage.name,
                printer.dim(&format!(
                    "({}, {} new)",
                    plural(stage.total, "tile", "tiles"),
                    stage.added
                ))
            ),
        );
    }

    printer.status(
        "Finished",
        &format!(
            "{} across {}, {} new",
            plural(report.images_written(), "image", "images"),
            plural(report.stages.len(), "tileset", "tilesets"),
            report.ids_added()
        ),
    );
    Ok(())
}
