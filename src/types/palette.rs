//! Named colour palettes used to tint decals.

use serde::Deserialize;

use crate::error::{Result, TiledError};

/// A palette prototype: an ordered list of named hex colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Palette name (falls back to the prototype id)
    pub name: String,

    /// Colour name and raw hex literal, in declaration order
    colours: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct RawPalette {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    colors: serde_yaml::Mapping,
}

impl Palette {
    /// Create an empty palette.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colours: Vec::new(),
        }
    }

    /// Build a palette from a `type: palette` prototype node.
    pub fn from_value(value: serde_yaml::Value) -> Result<Self> {
        let raw: RawPalette = serde_yaml::from_value(value).map_err(|e| TiledError::Parse {
            message: format!("Invalid palette prototype: {}", e),
            help: Some("Palettes need an id and a colors mapping".to_string()),
        })?;

        let mut palette = Self::new(raw.name.unwrap_or(raw.id));
        for (key, value) in raw.colors {
            match (key.as_str(), value.as_str()) {
                (Some(name), Some(hex)) => palette.push(name, hex),
                _ => tracing::warn!(palette = %palette.name, "skipping non-string palette entry"),
            }
        }
        Ok(palette)
    }

    /// Append a colour entry.
    pub fn push(&mut self, name: impl Into<String>, hex: impl Into<String>) {
        self.colours.push((name.into(), hex.into()));
    }

    /// Colour names with their hex literal, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colours.iter().map(|(n, h)| (n.as_str(), h.as_str()))
    }

    /// Qualified variant names (`<palette>_<colour>`) with their hex literal.
    pub fn variants(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.entries()
            .map(move |(colour, hex)| (format!("{}_{}", self.name, colour), hex))
    }
}
