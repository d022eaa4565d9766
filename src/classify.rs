//! Buckets entities into the fixed tileset groups.
//!
//! Groups are tested in priority order against the inherited parent set;
//! the first match wins and anything unmatched lands in `Other`.

use std::fmt;

use crate::prototype::{EntityMap, ResolvedEntity};

/// A tileset group for entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Pipes,
    Windoors,
    EatAndDrink,
    Clothes,
    Closets,
    Airlocks,
    Windows,
    Walls,
    Computers,
    Markers,
    Signs,
    Other,
}

impl Group {
    /// Every group, in priority order.
    pub const ALL: [Group; 12] = [
        Group::Pipes,
        Group::Windoors,
        Group::EatAndDrink,
        Group::Clothes,
        Group::Closets,
        Group::Airlocks,
        Group::Windows,
        Group::Walls,
        Group::Computers,
        Group::Markers,
        Group::Signs,
        Group::Other,
    ];

    /// Display label, also used in output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Group::Pipes => "Pipes",
            Group::Windoors => "Windoors",
            Group::EatAndDrink => "Eat and Drink",
            Group::Clothes => "Clothes",
            Group::Closets => "Closets and Lockers",
            Group::Airlocks => "Airlocks",
            Group::Windows => "Windows",
            Group::Walls => "Walls",
            Group::Computers => "Computers",
            Group::Markers => "Markers",
            Group::Signs => "Signs",
            Group::Other => "Other",
        }
    }

    /// Stage name for the cache and tileset files (`entities_<label>`).
    pub fn stage_name(&self) -> String {
        format!("entities_{}", self.label())
    }

    /// True if `entity` satisfies this group's rule on its own.
    fn matches(&self, e: &ResolvedEntity) -> bool {
        match self {
            Group::Pipes => e.has_parent("GasPipeBase") || e.has_parent("DisposalPipeBase"),
            Group::Windoors => e.has_parent("BaseWindoor"),
            Group::EatAndDrink => e.has_parent("FoodBase") || e.has_parent("DrinkBase"),
            Group::Clothes => e.has_parent("Clothing"),
            Group::Closets => e.has_parent("ClosetBase") || e.has_parent("BaseWallCloset"),
            Group::Airlocks => e.is_or_inherits("Airlock") || e.has_parent("BaseFirelock"),
            Group::Windows => {
                e.is_or_inherits("Window")
                    || e.is_or_inherits("WindowDirectional")
                    || e.has_parent("PlastitaniumWindowBase")
            }
            Group::Walls => {
                e.is_or_inherits("WallShuttleDiagonal")
                    || e.id == "WallPlastitaniumDiagonalIndestructible"
                    || e.has_parent("BaseWall")
            }
            Group::Computers => e.has_parent("BaseComputer"),
            Group::Markers => e.has_parent("MarkerBase"),
            Group::Signs => e.has_parent("BaseSign"),
            Group::Other => true,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify one entity.
pub fn classify(entity: &ResolvedEntity) -> Group {
    Group::ALL
        .into_iter()
        .find(|g| g.matches(entity))
        .unwrap_or(Group::Other)
}

/// Split entities into groups, in priority order, each sorted by id.
///
/// Every group is present, possibly empty.
pub fn group_entities(entities: &EntityMap) -> Vec<(Group, Vec<&ResolvedEntity>)> {
    let mut groups: Vec<(Group, Vec<&ResolvedEntity>)> =
        Group::ALL.into_iter().map(|g| (g, Vec::new())).collect();

    // EntityMap iterates in id order, so each bucket stays sorted.
    for entity in entities.values() {
        let group = classify(entity);
        if let Some((_, bucket)) = groups.iter_mut().find(|(g, _)| *g == group) {
            bucket.push(entity);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototype::EntityPrototype;

    fn entity(id: &str, parents: &[&str]) -> ResolvedEntity {
        EntityPrototype::new(id)
            .with_parents(parents.iter().copied())
            .into()
    }

    #[test]
    fn test_pipes_win_over_clothing() {
        assert_eq!(classify(&entity("Odd", &["Clothing", "GasPipeBase"])), Group::Pipes);
    }

    #[test]
    fn test_id_rules() {
        assert_eq!(classify(&entity("Airlock", &[])), Group::Airlocks);
        assert_eq!(classify(&entity("Window", &[])), Group::Windows);
        assert_eq!(classify(&entity("WallPlastitaniumDiagonalIndestructible", &[])), Group::Walls);
        assert_eq!(classify(&entity("AirlockGlass", &["Airlock"])), Group::Airlocks);
    }

    #[test]
    fn test_each_group_rule() {
        let cases = [
            ("DisposalPipeBase", Group::Pipes),
            ("BaseWindoor", Group::Windoors),
            ("DrinkBase", Group::EatAndDrink),
            ("Clothing", Group::Clothes),
            ("BaseWallCloset", Group::Closets),
            ("BaseFirelock", Group::Airlocks),
            ("PlastitaniumWindowBase", Group::Windows),
            ("BaseWall", Group::Walls),
            ("BaseComputer", Group::Computers),
            ("MarkerBase", Group::Markers),
            ("BaseSign", Group::Signs),
            ("BaseItem", Group::Other),
        ];
        for (parent, group) in cases {
            assert_eq!(classify(&entity("X", &[parent])), group, "{parent}");
        }
    }

    #[test]
    fn test_windoor_beats_airlock() {
        assert_eq!(classify(&entity("Windoor", &["BaseWindoor", "Airlock"])), Group::Windoors);
    }

    #[test]
    fn test_group_entities_keeps_all_groups_sorted() {
        let map: EntityMap = [
            entity("Zed", &["BaseSign"]),
            entity("Alpha", &["BaseSign"]),
            entity("Loose", &[]),
        ]
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();

        let groups = group_entities(&map);
        assert_eq!(groups.len(), Group::ALL.len());

        let signs: Vec<_> = groups[10].1.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(groups[10].0, Group::Signs);
        assert_eq!(signs, vec!["Alpha", "Zed"]);
        assert_eq!(groups[11].1.len(), 1);
    }

    #[test]
    fn test_stage_name() {
        assert_eq!(Group::EatAndDrink.stage_name(), "entities_Eat and Drink");
    }
}
