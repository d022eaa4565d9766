//! Entity prototypes and the per-component merge used by inheritance.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, TiledError};

use super::loader::scalar_string;

/// One component of an entity: its type name plus attribute fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: String,
    pub fields: Mapping,
}

impl Component {
    /// Create an empty component of the given type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Mapping::new(),
        }
    }

    /// Build a component from a prototype mapping (`type` plus fields).
    pub fn from_mapping(mut mapping: Mapping) -> Option<Self> {
        let kind = mapping.remove("type").and_then(|v| v.as_str().map(str::to_string))?;
        Some(Self {
            kind,
            fields: mapping,
        })
    }

    /// Builder-style field insertion.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(Value::from(key), value.into());
        self
    }

    /// Get a raw field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a scalar field rendered as a string.
    pub fn str_field(&self, key: &str) -> Option<String> {
        self.field(key).and_then(scalar_string)
    }

    /// Overwrite fields with the ones `other` declares, leaving the rest.
    fn merge_from(&mut self, other: &Component) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

/// Components keyed by type, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentMap {
    components: Vec<Component>,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, merging into an existing one of the same type.
    pub fn insert(&mut self, component: Component) {
        match self.components.iter_mut().find(|c| c.kind == component.kind) {
            Some(existing) => existing.merge_from(&component),
            None => self.components.push(component),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.kind == kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Merge `top` over `self`: component types `top` omits are kept as is,
    /// shared types are merged field by field with `top` winning.
    pub fn merge_from(&mut self, top: &ComponentMap) {
        for component in &top.components {
            self.insert(component.clone());
        }
    }
}

impl FromIterator<Component> for ComponentMap {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut map = Self::new();
        for component in iter {
            map.insert(component);
        }
        map
    }
}

/// An entity prototype as written in the source files.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPrototype {
    pub id: String,
    /// Declared parents; the first one seeds the merge.
    pub parents: Vec<String>,
    pub is_abstract: bool,
    pub suffix: Option<String>,
    pub categories: Option<Vec<String>>,
    pub components: ComponentMap,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Parents {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RawEntity {
    id: String,
    #[serde(default)]
    parent: Option<Parents>,
    #[serde(default, rename = "abstract")]
    is_abstract: Option<bool>,
    #[serde(default)]
    suffix: Option<Value>,
    #[serde(default)]
    categories: Option<Vec<Value>>,
    #[serde(default)]
    components: Option<Vec<Value>>,
}

impl EntityPrototype {
    /// Create a bare prototype with no parents or components.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parents: Vec::new(),
            is_abstract: false,
            suffix: None,
            categories: None,
            components: ComponentMap::new(),
        }
    }

    /// Parse a `type: entity` record.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawEntity = serde_yaml::from_value(value).map_err(|e| TiledError::Parse {
            message: format!("Invalid entity prototype: {}", e),
            help: None,
        })?;

        let parents = match raw.parent {
            Some(Parents::One(p)) => vec![p],
            Some(Parents::Many(ps)) => ps,
            None => Vec::new(),
        };

        let components = raw
            .components
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| match v {
                Value::Mapping(m) => Component::from_mapping(m),
                _ => None,
            })
            .collect();

        Ok(Self {
            id: raw.id,
            parents,
            is_abstract: raw.is_abstract.unwrap_or(false),
            suffix: raw.suffix.as_ref().and_then(scalar_string),
            categories: raw
                .categories
                .map(|cs| cs.iter().filter_map(scalar_string).collect()),
            components,
        })
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.insert(component);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn mark_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// An entity after every ancestor has been folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub id: String,
    /// Every ancestor id, used for classification only.
    pub parents: BTreeSet<String>,
    pub is_abstract: bool,
    pub suffix: Option<String>,
    pub categories: Option<Vec<String>>,
    pub components: ComponentMap,
}

impl ResolvedEntity {
    /// Merge `top` over `self`.
    ///
    /// Components merge per type and field, scalar flags fall through when
    /// `top` leaves them unset, and `abstract` is always taken from `top`.
    pub fn overlay(&self, top: &ResolvedEntity) -> ResolvedEntity {
        let mut out = self.clone();
        out.id = top.id.clone();
        out.is_abstract = top.is_abstract;
        if top.suffix.is_some() {
            out.suffix = top.suffix.clone();
        }
        if top.categories.is_some() {
            out.categories = top.categories.clone();
        }
        out.parents.extend(top.parents.iter().cloned());
        out.components.merge_from(&top.components);
        out
    }

    pub fn has_parent(&self, id: &str) -> bool {
        self.parents.contains(id)
    }

    /// True if the id is `id` or it inherits from `id`.
    pub fn is_or_inherits(&self, id: &str) -> bool {
        self.id == id || self.has_parent(id)
    }

    pub fn suffix_contains(&self, needle: &str) -> bool {
        self.suffix.as_deref().is_some_and(|s| s.contains(needle))
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.categories
            .as_ref()
            .is_some_and(|cs| cs.iter().any(|c| c == category))
    }

    /// Diagonal entities are rendered in four rotations of one sprite.
    pub fn is_diagonal(&self) -> bool {
        self.suffix
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains("diagonal"))
    }
}

impl From<EntityPrototype> for ResolvedEntity {
    fn from(proto: EntityPrototype) -> Self {
        Self {
            id: proto.id,
            parents: proto.parents.into_iter().collect(),
            is_abstract: proto.is_abstract,
            suffix: proto.suffix,
            categories: proto.categories,
            components: proto.components,
        }
    }
}
