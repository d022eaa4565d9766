//! Check command: load and resolve entity prototypes, then report how they
//! would be grouped. Inheritance errors fail the command.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::classify::group_entities;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{Layout, DEFAULT_OUTPUT};
use crate::prototype::{filter_entities, load_entities, resolve_entities};

/// Resolve entity prototypes without rendering
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Root of the game repository (contains Resources/)
    pub root: PathBuf,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let layout = Layout::new(&args.root, Path::new(DEFAULT_OUTPUT))?;

    let records = load_entities(&layout.prototypes);
    let record_count = records.len();
    let resolved = resolve_entities(records)?;
    let resolved_count = resolved.len();
    let entities = filter_entities(resolved);

    printer.status(
        "Resolved",
        &format!(
            "{} from {}",
            plural(resolved_count, "entity", "entities"),
            display_path(&layout.prototypes)
        ),
    );
    if resolved_count < record_count {
        printer.info(
            "Merged",
            &format!("{} redefined", plural(record_count - resolved_count, "id", "ids")),
        );
    }

    for (group, members) in group_entities(&entities) {
        println!("{:<20} {}", group.label(), members.len());
    }

    printer.status(
        "Finished",
        &format!("{} mappable", plural(entities.len(), "entity", "entities")),
    );
    Ok(())
}
