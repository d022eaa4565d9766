//! Entities: resolved, filtered, grouped and rendered per direction.

use crate::classify::{group_entities, Group};
use crate::error::Result;
use crate::prototype::{filter_entities, load_entities, resolve_entities, ResolvedEntity};
use crate::render::{direction_key, write_png, EntityRenderer, SpriteStore};

use super::stage::{Produced, Stage, StageReport};
use super::Layout;

/// Image directory shared by every entity group.
pub const IMAGE_DIR: &str = "entities";

pub fn run(layout: &Layout) -> Result<Vec<StageReport>> {
    let records = load_entities(&layout.prototypes);
    let entities = filter_entities(resolve_entities(records)?);
    tracing::info!(count = entities.len(), "rendering entities");

    let mut store = SpriteStore::new(&layout.textures);
    let mut reports = Vec::with_capacity(Group::ALL.len());
    for (group, members) in group_entities(&entities) {
        reports.push(render_group(layout, &mut store, group, &members)?);
    }
    tracing::debug!(rsis = store.rsi_count(), "sprite store");
    Ok(reports)
}

fn render_group(
    layout: &Layout,
    store: &mut SpriteStore,
    group: Group,
    members: &[&ResolvedEntity],
) -> Result<StageReport> {
    let stage = Stage::new(group.stage_name(), format!("Entities - {}", group.label()))
        .with_image_dir(IMAGE_DIR);
    let cache = stage.open(layout)?;
    let dir = layout.image_dir(IMAGE_DIR);

    let mut renderer = EntityRenderer::new(store);
    let mut produced = Vec::new();
    let mut skipped = 0;
    for entity in members {
        let images = match renderer.render(entity) {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(entity = %entity.id, "skipping entity: {}", e);
                skipped += 1;
                continue;
            }
        };

        for (direction, img) in images {
            let key = direction_key(&entity.id, direction);
            let file = format!("{}.png", key);
            if let Err(e) = write_png(&img, &dir.join(&file)) {
                tracing::warn!(entity = %entity.id, %direction, "skipping image: {}", e);
                continue;
            }
            produced.push(Produced {
                id: key,
                file,
                width: img.width(),
                height: img.height(),
            });
        }
    }

    stage.commit(layout, cache, produced, skipped)
}
