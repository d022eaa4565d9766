use std::io::IsTerminal;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use ss14_tiled::cli::{Cli, Commands};
use ss14_tiled::output::Printer;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).into_diagnostic()?;

    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => ss14_tiled::cli::generate::run(args, &printer)?,
        Commands::Check(args) => ss14_tiled::cli::check::run(args, &printer)?,
        Commands::Palettes(args) => ss14_tiled::cli::palettes::run(args, &printer)?,
        Commands::Completions(args) => ss14_tiled::cli::completions::run(args)?,
    }

    Ok(())
}
