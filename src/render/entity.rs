//! Entity sprite rendering: layer collection, per-direction frame lookup and
//! compositing.

use std::fmt;

use image::RgbaImage;
use serde_yaml::Value;

use crate::error::{Result, TiledError};
use crate::prototype::loader::scalar_string;
use crate::prototype::{Component, ResolvedEntity};
use crate::rsi::StateRef;

use super::compose::{composite, crop_frame, rotate_from_south};
use super::sprites::SpriteStore;

/// Facing directions in RSI sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    South,
    North,
    East,
    West,
    SouthEast,
    SouthWest,
    NorthEast,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::South,
        Direction::North,
        Direction::East,
        Direction::West,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthEast,
        Direction::NorthWest,
    ];

    /// Position within an RSI state's direction block.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Short name used in output file names.
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::South => "S",
            Direction::North => "N",
            Direction::East => "E",
            Direction::West => "W",
            Direction::SouthEast => "SE",
            Direction::SouthWest => "SW",
            Direction::NorthEast => "NE",
            Direction::NorthWest => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Cache key and file stem for one rendered direction.
pub fn direction_key(id: &str, direction: Direction) -> String {
    format!("{}_{}", id, direction.suffix())
}

/// One layer of a sprite, with the component's default sprite filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteLayer {
    pub sprite: Option<String>,
    pub state: Option<StateRef>,
    pub visible: bool,
    /// Layer draws through a layer map or a custom layer type.
    pub mapped: bool,
}

impl SpriteLayer {
    pub fn new(sprite: impl Into<String>, state: StateRef) -> Self {
        Self {
            sprite: Some(sprite.into()),
            state: Some(state),
            visible: true,
            mapped: false,
        }
    }

    fn from_value(value: &Value, default_sprite: Option<&str>) -> Self {
        let sprite = value
            .get("sprite")
            .and_then(scalar_string)
            .or_else(|| default_sprite.map(str::to_string));
        let visible = !matches!(value.get("visible"), Some(Value::Bool(false) | Value::Null));
        Self {
            sprite,
            state: value.get("state").and_then(StateRef::from_value),
            visible,
            mapped: value.get("map").is_some() || value.get("type").is_some(),
        }
    }
}

/// Collect the layers to draw for `entity`.
///
/// Uses the `Sprite` component's `layers` if declared, otherwise a single
/// layer from its own sprite and state, otherwise the `Icon` component.
pub fn sprite_layers(entity: &ResolvedEntity) -> Option<Vec<SpriteLayer>> {
    let sprite = entity.components.get("Sprite")?;
    let default_sprite = sprite.str_field("sprite");

    if let Some(Value::Sequence(layers)) = sprite.field("layers") {
        return Some(
            layers
                .iter()
                .map(|layer| SpriteLayer::from_value(layer, default_sprite.as_deref()))
                .collect(),
        );
    }

    single_layer(sprite)
        .or_else(|| entity.components.get("Icon").and_then(single_layer))
        .map(|layer| vec![layer])
}

fn single_layer(component: &Component) -> Option<SpriteLayer> {
    let sprite = component.str_field("sprite")?;
    let state = component.field("state").and_then(StateRef::from_value)?;
    Some(SpriteLayer::new(sprite, state))
}

/// Renders entities to one image per facing direction.
pub struct EntityRenderer<'a> {
    store: &'a mut SpriteStore,
}

impl<'a> EntityRenderer<'a> {
    pub fn new(store: &'a mut SpriteStore) -> Self {
        Self { store }
    }

    /// Render every direction `entity` supports.
    ///
    /// Broken layers and directions are logged and skipped; an entity with
    /// nothing to draw at all is an error.
    pub fn render(&mut self, entity: &ResolvedEntity) -> Result<Vec<(Direction, RgbaImage)>> {
        let layers = sprite_layers(entity)
            .ok_or_else(|| TiledError::build(format!("entity '{}' has no sprite", entity.id)))?;

        if entity.is_diagonal() {
            let mut max_directions = 4;
            let south = self
                .compose(&entity.id, &layers, Direction::South, &mut max_directions)
                .ok_or_else(|| no_layers(&entity.id))?;
            return Ok(Direction::ALL[..4]
                .iter()
                .map(|&d| (d, rotate_from_south(&south, d)))
                .collect());
        }

        // Layers may raise the direction count while the first direction is drawn.
        let mut max_directions = 1;
        let mut images = Vec::new();
        for direction in Direction::ALL {
            if direction.index() >= max_directions {
                break;
            }
            match self.compose(&entity.id, &layers, direction, &mut max_directions) {
                Some(img) => images.push((direction, img)),
                None => tracing::warn!(entity = %entity.id, %direction, "{}", no_layers(&entity.id)),
            }
        }
        if images.is_empty() {
            return Err(no_layers(&entity.id));
        }
        Ok(images)
    }

    fn compose(
        &mut self,
        id: &str,
        layers: &[SpriteLayer],
        direction: Direction,
        max_directions: &mut u32,
    ) -> Option<RgbaImage> {
        let mut frames = Vec::with_capacity(layers.len());
        for layer in layers.iter().filter(|l| l.visible) {
            let Some(sprite) = layer.sprite.as_deref() else {
                tracing::warn!(entity = %id, "layer is missing a sprite");
                continue;
            };
            let Some(state) = layer.state.as_ref() else {
                if !layer.mapped {
                    tracing::warn!(entity = %id, "layer is missing a state");
                }
                continue;
            };

            match self.layer_frame(sprite, state, direction, max_directions) {
                Ok(frame) => frames.push(frame),
                Err(e) => tracing::warn!(entity = %id, %direction, "skipping layer: {}", e),
            }
        }
        composite(frames)
    }

    fn layer_frame(
        &mut self,
        sprite: &str,
        state: &StateRef,
        direction: Direction,
        max_directions: &mut u32,
    ) -> Result<RgbaImage> {
        let meta = self.store.meta(sprite)?;
        let rsi_state = meta.find_state(state).ok_or_else(|| {
            TiledError::build(format!("missing state '{}' in '{}'", state, sprite))
        })?;

        let directions = rsi_state.direction_count();
        if ![1, 4, 8].contains(&directions) {
            return Err(TiledError::build(format!(
                "state '{}' wants {} directions",
                rsi_state.name, directions
            )));
        }
        *max_directions = (*max_directions).max(directions);

        let index = if directions == 1 {
            0
        } else if directions == *max_directions {
            rsi_state.first_frame(direction.index())
        } else {
            return Err(TiledError::build(format!(
                "state '{}' has {} directions, incompatible with {}",
                rsi_state.name, directions, max_directions
            )));
        };

        let sheet = self.store.sheet(sprite, &rsi_state.name)?;
        crop_frame(&sheet, &meta, index)
    }
}

fn no_layers(id: &str) -> TiledError {
    TiledError::build(format!("entity '{}' has no valid layers", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototype::EntityPrototype;
    use image::Rgba;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    /// Write an RSI whose sheet cells are each filled with their index as red.
    fn write_rsi(textures: &Path, name: &str, state: &str, directions: u32, cells: u32) {
        let dir = textures.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("meta.json"),
            format!(
                r#"{{"size": {{"x": 2, "y": 2}}, "states": [{{"name": "{}", "directions": {}}}]}}"#,
                state, directions
            ),
        )
        .unwrap();
        let sheet = RgbaImage::from_fn(cells * 2, 2, |x, _| Rgba([(x / 2) as u8, 0, 0, 255]));
        sheet.save(dir.join(format!("{}.png", state))).unwrap();
    }

    fn sprite_entity(id: &str, sprite: Component) -> ResolvedEntity {
        EntityPrototype::new(id).with_component(sprite).into()
    }

    #[test]
    fn test_layers_from_sprite_fields() {
        let e = sprite_entity(
            "Wrench",
            Component::new("Sprite").with("sprite", "Objects/wrench.rsi").with("state", "icon"),
        );
        assert_eq!(
            sprite_layers(&e).unwrap(),
            vec![SpriteLayer::new("Objects/wrench.rsi", StateRef::Name("icon".into()))]
        );
    }

    #[test]
    fn test_layers_fall_back_to_icon() {
        let e: ResolvedEntity = EntityPrototype::new("Thing")
            .with_component(Component::new("Sprite"))
            .with_component(Component::new("Icon").with("sprite", "a.rsi").with("state", true))
            .into();
        let layers = sprite_layers(&e).unwrap();
        assert_eq!(layers[0].state, Some(StateRef::Flag(true)));
    }

    #[test]
    fn test_explicit_layers_inherit_sprite() {
        let layers: Value = serde_yaml::from_str(
            "- state: base\n- sprite: other.rsi\n  state: top\n  visible: false\n- map: [enum.Foo]\n",
        )
        .unwrap();
        let e = sprite_entity(
            "Thing",
            Component::new("Sprite").with("sprite", "main.rsi").with("layers", layers),
        );
        let layers = sprite_layers(&e).unwrap();
        assert_eq!(layers[0].sprite.as_deref(), Some("main.rsi"));
        assert_eq!(layers[1].sprite.as_deref(), Some("other.rsi"));
        assert!(!layers[1].visible);
        assert!(layers[2].mapped);
        assert_eq!(layers[2].state, None);
    }

    #[test]
    fn test_no_sprite_is_error() {
        let dir = tempdir().unwrap();
        let mut store = SpriteStore::new(dir.path());
        let e = sprite_entity("Blank", Component::new("Sprite"));
        assert!(EntityRenderer::new(&mut store).render(&e).is_err());
    }

    #[test]
    fn test_four_direction_state() {
        let dir = tempdir().unwrap();
        write_rsi(dir.path(), "pipe.rsi", "pipe", 4, 4);
        let mut store = SpriteStore::new(dir.path());

        let e = sprite_entity(
            "Pipe",
            Component::new("Sprite").with("sprite", "/Textures/pipe.rsi").with("state", "pipe"),
        );
        let images = EntityRenderer::new(&mut store).render(&e).unwrap();

        let dirs: Vec<_> = images.iter().map(|(d, _)| d.suffix()).collect();
        assert_eq!(dirs, vec!["S", "N", "E", "W"]);
        for (i, (_, img)) in images.iter().enumerate() {
            assert_eq!(img.get_pixel(0, 0)[0], i as u8);
        }
    }

    #[test]
    fn test_single_direction_layer_over_four() {
        let dir = tempdir().unwrap();
        write_rsi(dir.path(), "base.rsi", "base", 4, 4);
        write_rsi(dir.path(), "light.rsi", "light", 1, 1);
        let mut store = SpriteStore::new(dir.path());

        let layers: Value =
            serde_yaml::from_str("- sprite: base.rsi\n  state: base\n- sprite: light.rsi\n  state: light\n")
                .unwrap();
        let e = sprite_entity("Lamp", Component::new("Sprite").with("layers", layers));
        let images = EntityRenderer::new(&mut store).render(&e).unwrap();
        assert_eq!(images.len(), 4);
        // Opaque single-frame top layer covers every direction.
        assert!(images.iter().all(|(_, img)| img.get_pixel(0, 0)[0] == 0));
    }

    #[test]
    fn test_bad_direction_count_skips_layer() {
        let dir = tempdir().unwrap();
        write_rsi(dir.path(), "odd.rsi", "odd", 3, 3);
        let mut store = SpriteStore::new(dir.path());
        let e = sprite_entity(
            "Odd",
            Component::new("Sprite").with("sprite", "odd.rsi").with("state", "odd"),
        );
        assert!(EntityRenderer::new(&mut store).render(&e).is_err());
    }

    #[test]
    fn test_diagonal_rotates_south() {
        let dir = tempdir().unwrap();
        let rsi = dir.path().join("wall.rsi");
        fs::create_dir_all(&rsi).unwrap();
        fs::write(
            rsi.join("meta.json"),
            r#"{"size": {"x": 2, "y": 2}, "states": [{"name": "state0"}]}"#,
        )
        .unwrap();
        let mut sheet = RgbaImage::new(2, 2);
        sheet.put_pixel(0, 0, RED);
        sheet.save(rsi.join("state0.png")).unwrap();

        let mut store = SpriteStore::new(dir.path());
        let e: ResolvedEntity = EntityPrototype::new("WallDiag")
            .with_suffix("Diagonal")
            .with_component(Component::new("Sprite").with("sprite", "wall.rsi").with("state", "state0"))
            .into();

        let images = EntityRenderer::new(&mut store).render(&e).unwrap();
        assert_eq!(images.len(), 4);
        assert_eq!(*images[0].1.get_pixel(0, 0), RED);
        assert_eq!(*images[1].1.get_pixel(1, 1), RED);
        assert_eq!(*images[2].1.get_pixel(0, 1), RED);
        assert_eq!(*images[3].1.get_pixel(1, 0), RED);
    }

    #[test]
    fn test_direction_key() {
        assert_eq!(direction_key("Pipe", Direction::NorthWest), "Pipe_NW");
    }
}
