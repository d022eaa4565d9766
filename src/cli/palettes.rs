use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::Result;
use crate::output::{plural, Printer};
use crate::pipeline::{decal_variants, Layout, DEFAULT_OUTPUT};
use crate::prototype::load_palettes;

/// List decal colour variants from palette prototypes
#[derive(Args, Debug)]
pub struct PalettesArgs {
    /// Root of the game repository (contains Resources/)
    pub root: PathBuf,
}

pub fn run(args: PalettesArgs, printer: &Printer) -> Result<()> {
    let layout = Layout::new(&args.root, Path::new(DEFAULT_OUTPUT))?;
    let palettes = load_palettes(&layout.prototypes.join("Palettes"));

    // The first variant is the untinted set.
    let variants: Vec<_> = decal_variants(&palettes).into_iter().skip(1).collect();
    printer.status(
        "Found",
        &format!(
            "{} in {}",
            plural(variants.len(), "variant", "variants"),
            plural(palettes.len(), "palette", "palettes")
        ),
    );

    for variant in &variants {
        println!("decals_{}: {}", variant.name, variant.colour);
    }
    Ok(())
}
