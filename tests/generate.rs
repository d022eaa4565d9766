//! End-to-end runs of `generate` over a synthetic game repository.

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use ss14_tiled::{generate, generate_with, AtlasCache, GenerateOptions, TiledError};
use tempfile::tempdir;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn save(path: &Path, img: &RgbaImage) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save(path).unwrap();
}

/// A repository with one floor tile, one decal, one palette colour, a
/// four-direction pipe and a diagonal wall.
fn repository(root: &Path) {
    let prototypes = root.join("Resources/Prototypes");
    let textures = root.join("Resources/Textures");

    write(
        &prototypes.join("Tiles/floors.yml"),
        "- type: tile\n  id: floor\n  sprite: /Tiles/floor.png\n  variants: 2\n\
         - type: tile\n  id: space\n",
    );
    // Left frame red, right frame blue.
    save(
        &root.join("Resources/Tiles/floor.png"),
        &RgbaImage::from_fn(64, 32, |x, _| if x < 32 { RED } else { BLUE }),
    );

    write(
        &prototypes.join("Decals/arrows.yml"),
        "- type: decal\n  id: Arrow\n  sprite:\n    sprite: /Textures/Decals/arrows.rsi\n    state: arrow\n",
    );
    save(
        &textures.join("Decals/arrows.rsi/arrow.png"),
        &RgbaImage::from_pixel(4, 4, WHITE),
    );
    write(
        &prototypes.join("Palettes/departments.yml"),
        "- type: palette\n  id: Departments\n  name: Departmental\n  colors:\n    Security: \"#FF0000\"\n",
    );

    write(
        &prototypes.join("Entities/structures.yml"),
        "- type: entity\n  id: GasPipeBase\n  abstract: true\n  components:\n  - type: Sprite\n    sprite: /Textures/Structures/pipe.rsi\n\
         - type: entity\n  parent: GasPipeBase\n  id: GasPipeStraight\n  components:\n  - type: Sprite\n    state: pipeStraight\n\
         - type: entity\n  id: WallDiagonal\n  suffix: Diagonal\n  components:\n  - type: Sprite\n    sprite: /Textures/Structures/wall.rsi\n    state: state0\n",
    );
    write(
        &textures.join("Structures/pipe.rsi/meta.json"),
        r#"{"version": 1, "size": {"x": 4, "y": 4}, "states": [{"name": "pipeStraight", "directions": 4}]}"#,
    );
    save(
        &textures.join("Structures/pipe.rsi/pipeStraight.png"),
        &RgbaImage::from_fn(16, 4, |x, _| Rgba([(x / 4) as u8 * 60, 0, 0, 255])),
    );
    write(
        &textures.join("Structures/wall.rsi/meta.json"),
        "\u{feff}{\"size\": {\"x\": 4, \"y\": 4}, \"states\": [{\"name\": \"state0\"}]}",
    );
    let mut wall = RgbaImage::new(4, 4);
    wall.put_pixel(0, 0, RED);
    save(&textures.join("Structures/wall.rsi/state0.png"), &wall);
}

fn ids(out: &Path, stage: &str) -> Vec<String> {
    AtlasCache::load(&out.join(".data").join(format!("{}.json", stage)))
        .unwrap()
        .ids()
        .to_vec()
}

fn load(path: &Path) -> RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

#[test]
fn test_tile_first_variant() {
    let dir = tempdir().unwrap();
    repository(dir.path());
    let out = dir.path().join("dist");

    generate(dir.path(), None, Some(&out)).unwrap();

    let floor = load(&out.join(".images/tiles/floor.png"));
    assert_eq!(floor.dimensions(), (32, 32));
    assert!(floor.pixels().all(|p| *p == RED));

    assert_eq!(ids(&out, "tiles"), vec!["floor"]);
    let tsx = fs::read_to_string(out.join("tiles.tsx")).unwrap();
    assert!(tsx.contains(r#"<tileset name="Tiles">"#));
    assert!(tsx.contains(r#"<tile id="1">"#));
    assert_eq!(tsx.matches("<tile ").count(), 1);
    assert!(tsx.contains(r#"source="./.images/tiles/floor.png" width="32" height="32""#));

    let json = fs::read_to_string(out.join(".data/tiles.json")).unwrap();
    assert!(json.contains(r#""width": "32""#));
}

#[test]
fn test_decals_per_palette_colour() {
    let dir = tempdir().unwrap();
    repository(dir.path());
    let out = dir.path().join("dist");

    generate(dir.path(), None, Some(&out)).unwrap();

    assert_eq!(ids(&out, "decals"), vec!["Arrow"]);
    assert_eq!(ids(&out, "decals_Departmental_Security"), vec!["Arrow"]);

    let plain = load(&out.join(".images/decals/Arrow.png"));
    assert_eq!(*plain.get_pixel(0, 0), WHITE);
    let tinted = load(&out.join(".images/decals_Departmental_Security/Arrow.png"));
    assert_eq!(*tinted.get_pixel(0, 0), RED);

    let tsx = fs::read_to_string(out.join("decals_Departmental_Security.tsx")).unwrap();
    assert!(tsx.contains(r#"<tileset name="Decals - Departmental_Security">"#));
    assert!(tsx.contains(r#"<property name="color_name" value="Departmental_Security"/>"#));
    assert!(tsx.contains(r##"<property name="color_value" value="#FF0000"/>"##));
}

#[test]
fn test_entities_per_direction() {
    let dir = tempdir().unwrap();
    repository(dir.path());
    let out = dir.path().join("dist");

    let report = generate(dir.path(), None, Some(&out)).unwrap();

    assert_eq!(
        ids(&out, "entities_Pipes"),
        vec!["GasPipeStraight_S", "GasPipeStraight_N", "GasPipeStraight_E", "GasPipeStraight_W"]
    );
    for (i, dir) in ["S", "N", "E", "W"].iter().enumerate() {
        let img = load(&out.join(format!(".images/entities/GasPipeStraight_{}.png", dir)));
        assert_eq!(img.get_pixel(0, 0)[0], i as u8 * 60);
    }

    // Diagonal walls are the south sprite rotated.
    assert_eq!(
        ids(&out, "entities_Other"),
        vec!["WallDiagonal_S", "WallDiagonal_N", "WallDiagonal_E", "WallDiagonal_W"]
    );
    let north = load(&out.join(".images/entities/WallDiagonal_N.png"));
    assert_eq!(*north.get_pixel(3, 3), RED);

    // Abstract bases are never rendered.
    assert!(!out.join(".images/entities/GasPipeBase_S.png").exists());
    assert!(out.join("entities_Eat and Drink.tsx").is_file());
    assert_eq!(report.stage("entities_Pipes").unwrap().added, 4);
}

#[test]
fn test_second_run_appends_only() {
    let dir = tempdir().unwrap();
    repository(dir.path());
    let out = dir.path().join("dist");

    let first = generate(dir.path(), None, Some(&out)).unwrap();
    assert!(first.ids_added() > 0);
    let pipes = ids(&out, "entities_Pipes");

    write(
        &dir.path().join("Resources/Prototypes/Tiles/plating.yml"),
        "- type: tile\n  id: plating\n  sprite: /Tiles/floor.png\n",
    );
    let second = generate(dir.path(), None, Some(&out)).unwrap();

    assert_eq!(second.ids_added(), 1);
    assert_eq!(ids(&out, "tiles"), vec!["floor", "plating"]);
    assert_eq!(ids(&out, "entities_Pipes"), pipes);
    assert_eq!(second.images_written(), first.images_written() + 1);

    let tsx = fs::read_to_string(out.join("tiles.tsx")).unwrap();
    assert!(tsx.contains(r#"<tile id="2">"#));
}

#[test]
fn test_missing_textures_is_validation_error() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Resources/Prototypes")).unwrap();

    let err = generate(dir.path(), None, Some(&dir.path().join("dist"))).unwrap_err();
    assert!(matches!(err, TiledError::Validation { .. }));
}

#[test]
fn test_dangling_parent_fails_the_run() {
    let dir = tempdir().unwrap();
    repository(dir.path());
    write(
        &dir.path().join("Resources/Prototypes/Entities/broken.yml"),
        "- type: entity\n  parent: NoSuchBase\n  id: Orphan\n",
    );

    let err = generate(dir.path(), None, Some(&dir.path().join("dist"))).unwrap_err();
    assert!(matches!(err, TiledError::Inheritance { .. }));
    assert!(err.to_string().contains("NoSuchBase"));
}

#[test]
fn test_broken_sprite_is_skipped() {
    let dir = tempdir().unwrap();
    repository(dir.path());
    write(
        &dir.path().join("Resources/Prototypes/Entities/missing.yml"),
        "- type: entity\n  id: Ghost\n  components:\n  - type: Sprite\n    sprite: /Textures/Nowhere.rsi\n    state: icon\n",
    );
    let out = dir.path().join("dist");

    let report = generate(dir.path(), None, Some(&out)).unwrap();
    assert_eq!(report.stage("entities_Other").unwrap().skipped, 1);
    assert!(!ids(&out, "entities_Other").iter().any(|id| id.starts_with("Ghost")));
}

#[test]
fn test_parallel_results_append_in_id_order() {
    let dir = tempdir().unwrap();
    repository(dir.path());
    let prototypes = dir.path().join("Resources/Prototypes");
    write(
        &prototypes.join("Tiles/floors.yml"),
        "- type: tile\n  id: Zeta\n  sprite: /Tiles/floor.png\n\
         - type: tile\n  id: Mu\n  sprite: /Tiles/floor.png\n\
         - type: tile\n  id: Alpha\n  sprite: /Tiles/floor.png\n",
    );
    write(
        &prototypes.join("Decals/arrows.yml"),
        "- type: decal\n  id: Zeta\n  sprite:\n    sprite: /Textures/Decals/arrows.rsi\n    state: arrow\n\
         - type: decal\n  id: Alpha\n  sprite:\n    sprite: /Textures/Decals/arrows.rsi\n    state: arrow\n",
    );

    for run in 0..4 {
        let options = GenerateOptions {
            output: dir.path().join(format!("dist{}", run)),
            workers: 8,
        };
        generate_with(dir.path(), &options, None).unwrap();

        assert_eq!(ids(&options.output, "tiles"), vec!["Alpha", "Mu", "Zeta"]);
        assert_eq!(ids(&options.output, "decals"), vec!["Alpha", "Zeta"]);
        assert_eq!(ids(&options.output, "decals_Departmental_Security"), vec!["Alpha", "Zeta"]);
    }
}
