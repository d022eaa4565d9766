//! Exclusion rules deciding which resolved entities get a tile.

use super::entity::ResolvedEntity;
use super::resolver::EntityMap;

/// A rule that excludes an entity when it returns true.
type Exclusion = fn(&ResolvedEntity) -> bool;

const EXCLUSIONS: &[(&str, Exclusion)] = &[
    ("abstract", |e| e.is_abstract),
    ("no sprite", |e| !e.components.contains("Sprite")),
    ("timed despawn", |e| e.components.contains("TimedDespawn")),
    ("debug suffix", |e| e.suffix_contains("DEBUG")),
    ("admin suffix", |e| e.suffix_contains("Admeme")),
    ("do-not-map suffix", |e| e.suffix_contains("DO NOT MAP")),
    ("hidden from spawn menu", |e| e.in_category("HideSpawnMenu")),
    ("player input", |e| e.components.contains("Input")),
    ("random spawner", |e| e.components.contains("RandomHumanoidSpawner")),
];

/// The first exclusion rule matching `entity`, if any.
pub fn exclusion_reason(entity: &ResolvedEntity) -> Option<&'static str> {
    EXCLUSIONS
        .iter()
        .find(|(_, rule)| rule(entity))
        .map(|(name, _)| *name)
}

/// True if the entity should appear in a tileset.
pub fn is_mappable(entity: &ResolvedEntity) -> bool {
    exclusion_reason(entity).is_none()
}

/// Keep only mappable entities.
pub fn filter_entities(entities: EntityMap) -> EntityMap {
    let before = entities.len();
    let kept: EntityMap = entities
        .into_iter()
        .filter(|(_, e)| is_mappable(e))
        .collect();
    tracing::debug!(kept = kept.len(), dropped = before - kept.len(), "filtered entities");
    kept
}
