//! RSI sprite-sheet metadata (`meta.json`).
//!
//! An RSI is a directory holding one PNG sheet per animation state plus a
//! `meta.json` describing the cell size and, per state, the direction count
//! and frame delays. Frames are packed row-major: every direction's frames
//! follow one another.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{Result, TiledError};

/// Name of the metadata file inside an RSI directory.
pub const META_FILENAME: &str = "meta.json";

const YES: [&str; 4] = ["y", "yes", "true", "on"];
const NO: [&str; 4] = ["n", "no", "false", "off"];

/// Parsed `meta.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RsiMeta {
    pub size: RsiSize,
    #[serde(default)]
    pub states: Vec<RsiState>,
}

/// Cell size of every frame on the sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RsiSize {
    pub x: u32,
    pub y: u32,
}

/// One animation state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RsiState {
    pub name: String,
    #[serde(default)]
    pub directions: Option<u32>,
    /// Frame delays, one list per direction.
    #[serde(default)]
    pub delays: Option<Vec<Vec<f32>>>,
}

impl RsiState {
    /// Number of facing directions (defaults to 1).
    pub fn direction_count(&self) -> u32 {
        self.directions.unwrap_or(1)
    }

    /// Number of animation frames stored per direction (defaults to 1).
    pub fn frames_per_direction(&self) -> u32 {
        self.delays
            .as_ref()
            .and_then(|d| d.first())
            .map_or(1, |first| first.len() as u32)
    }

    /// Sheet index of the first frame facing `direction`.
    pub fn first_frame(&self, direction: u32) -> u32 {
        self.frames_per_direction() * direction
    }
}

/// Reference to a state as written in a sprite layer.
///
/// YAML turns bare `true`/`false`/`on`/`off` into booleans, so a state name
/// may arrive as a flag that has to be matched against its synonyms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateRef {
    Name(String),
    Flag(bool),
}

impl StateRef {
    /// Interpret a YAML scalar as a state reference.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(StateRef::Flag(*b)),
            Value::String(s) => Some(StateRef::Name(s.clone())),
            Value::Number(n) => Some(StateRef::Name(n.to_string())),
            _ => None,
        }
    }

    /// True if a state called `name` satisfies this reference.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            StateRef::Name(n) => n == name,
            StateRef::Flag(flag) => {
                let synonyms = if *flag { &YES } else { &NO };
                let lower = name.to_lowercase();
                synonyms.contains(&lower.as_str())
            }
        }
    }
}

impl std::fmt::Display for StateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateRef::Name(n) => write!(f, "{}", n),
            StateRef::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl RsiMeta {
    /// Parse metadata text, tolerating a leading byte-order marker.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim_start_matches('\u{feff}');
        serde_json::from_str(text).map_err(|e| TiledError::Parse {
            message: format!("Invalid RSI metadata: {}", e),
            help: None,
        })
    }

    /// Load `meta.json` from an RSI directory.
    pub fn load(rsi_dir: &Path) -> Result<Self> {
        let path = rsi_dir.join(META_FILENAME);
        let text = fs::read_to_string(&path).map_err(|e| TiledError::io(&path, e))?;
        Self::parse(&text).map_err(|e| TiledError::io(&path, e))
    }

    /// Find the state a layer refers to.
    pub fn find_state(&self, state: &StateRef) -> Option<&RsiState> {
        self.states.iter().find(|s| state.matches(&s.name)).or_else(|| {
            let literal = state.to_string();
            self.states.iter().find(|s| s.name == literal)
        })
    }

    /// Top-left corner of frame `index` on a sheet `sheet_width` pixels wide.
    ///
    /// Returns `None` when the sheet is narrower than one cell or the
    /// position does not fit in `u32`.
    pub fn frame_origin(&self, index: u32, sheet_width: u32) -> Option<(u32, u32)> {
        if self.size.x == 0 {
            return None;
        }
        let columns = sheet_width / self.size.x;
        if columns == 0 {
            return None;
        }
        let x = (index % columns).checked_mul(self.size.x)?;
        let y = (index / columns).checked_mul(self.size.y)?;
        Some((x, y))
    }
}
