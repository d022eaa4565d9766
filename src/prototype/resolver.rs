//! Fixed-point inheritance resolution.
//!
//! Records without parents resolve immediately. The rest wait in a worklist
//! that is rescanned until it empties; a record resolves once every declared
//! parent has. A scan that resolves nothing means the input is broken
//! (dangling parent or cycle) and is reported as a hard error.

use std::collections::BTreeMap;

use crate::error::{Result, TiledError};

use super::entity::{EntityPrototype, ResolvedEntity};
use super::graph::{Blocker, ParentGraph};

/// Resolved entities keyed by id.
pub type EntityMap = BTreeMap<String, ResolvedEntity>;

/// Resolve inheritance for a batch of entity prototypes.
///
/// Duplicate ids keep the last definition.
pub fn resolve_entities(records: impl IntoIterator<Item = EntityPrototype>) -> Result<EntityMap> {
    let mut unique: BTreeMap<String, EntityPrototype> = BTreeMap::new();
    for record in records {
        unique.insert(record.id.clone(), record);
    }

    let mut resolved = EntityMap::new();
    let mut pending = Vec::new();
    for record in unique.into_values() {
        if record.parents.is_empty() {
            resolved.insert(record.id.clone(), record.into());
        } else {
            pending.push(record);
        }
    }

    let mut scans = 0usize;
    while !pending.is_empty() {
        scans += 1;
        let before = pending.len();
        let mut waiting = Vec::with_capacity(before);

        for record in pending {
            if record.parents.iter().all(|p| resolved.contains_key(p)) {
                let merged = merge_with_parents(record, &resolved);
                resolved.insert(merged.id.clone(), merged);
            } else {
                waiting.push(record);
            }
        }

        if waiting.len() == before {
            return Err(structural_error(&waiting, &resolved));
        }
        pending = waiting;
    }

    tracing::debug!(entities = resolved.len(), scans, "resolved entity inheritance");
    Ok(resolved)
}

/// Fold the parents left to right, then the record itself on top.
fn merge_with_parents(record: EntityPrototype, resolved: &EntityMap) -> ResolvedEntity {
    let mut parents = record.parents.iter().map(|p| &resolved[p]);
    let first = parents.next().cloned();
    let base = parents.fold(first, |acc, parent| {
        Some(match acc {
            Some(acc) => acc.overlay(parent),
            None => parent.clone(),
        })
    });

    let own = ResolvedEntity::from(record);
    match base {
        Some(base) => base.overlay(&own),
        None => own,
    }
}

fn structural_error(waiting: &[EntityPrototype], resolved: &EntityMap) -> TiledError {
    let mut graph = ParentGraph::new();
    for record in waiting {
        graph.register(record.id.as_str());
        for parent in &record.parents {
            graph.add_edge(record.id.as_str(), parent.as_str());
        }
    }

    let message = match graph.blocker(|id| resolved.contains_key(id)) {
        Some(Blocker::MissingParent { child, parent }) => {
            format!("Entity '{}' inherits from unknown parent '{}'", child, parent)
        }
        Some(Blocker::Cycle(cycle)) => {
            format!("Inheritance cycle detected: {}", cycle.join(" -> "))
        }
        None => format!("{} entities could not be resolved", waiting.len()),
    };

    TiledError::Inheritance {
        message,
        help: Some("The prototype tree is inconsistent; check the parent fields".to_string()),
    }
}
