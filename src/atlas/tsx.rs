//! Tiled tileset (`.tsx`) output.

use std::fmt::Display;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::AtlasCache;
use crate::error::{Result, TiledError};

/// Render the tileset XML for `cache`.
///
/// Tiles are numbered from 1 in cache order. `properties` become a
/// `<properties>` block when non-empty.
pub fn render_tsx(cache: &AtlasCache, name: &str, properties: &[(&str, &str)]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut tileset = BytesStart::new("tileset");
    tileset.push_attribute(("name", name));
    write(&mut writer, Event::Start(tileset))?;

    if !properties.is_empty() {
        write(&mut writer, Event::Start(BytesStart::new("properties")))?;
        for (key, value) in properties {
            let mut property = BytesStart::new("property");
            property.push_attribute(("name", *key));
            property.push_attribute(("value", *value));
            write(&mut writer, Event::Empty(property))?;
        }
        write(&mut writer, Event::End(BytesEnd::new("properties")))?;
    }

    for (i, image) in cache.images().iter().enumerate() {
        let mut tile = BytesStart::new("tile");
        tile.push_attribute(("id", (i + 1).to_string().as_str()));
        write(&mut writer, Event::Start(tile))?;

        let mut img = BytesStart::new("image");
        img.push_attribute(("source", image.source.as_str()));
        img.push_attribute(("width", image.width.to_string().as_str()));
        img.push_attribute(("height", image.height.to_string().as_str()));
        write(&mut writer, Event::Empty(img))?;

        write(&mut writer, Event::End(BytesEnd::new("tile")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("tileset")))?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_error)
}

/// Render and write the tileset to `path`.
pub fn write_tsx(
    cache: &AtlasCache,
    name: &str,
    path: &Path,
    properties: &[(&str, &str)],
) -> Result<()> {
    let xml = render_tsx(cache, name, properties)?;
    fs::write(path, xml).map_err(|e| TiledError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write tileset: {}", e),
    })
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(xml_error)
}

fn xml_error(e: impl Display) -> TiledError {
    TiledError::Build {
        message: format!("Failed to write tileset XML: {}", e),
        help: None,
    }
}
