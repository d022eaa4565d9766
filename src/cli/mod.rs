pub mod check;
pub mod completions;
pub mod generate;
pub mod palettes;

use clap::{Parser, Subcommand};

/// ss14-tiled - Tiled tileset generator for Space Station 14 repositories
#[derive(Parser, Debug)]
#[command(name = "ss14-tiled")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log per-item detail
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate decal, entity and tile tilesets
    Generate(generate::GenerateArgs),

    /// Resolve entity prototypes without rendering
    Check(check::CheckArgs),

    /// List decal colour variants from palette prototypes
    Palettes(palettes::PalettesArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
