//! Prototype file discovery and YAML loading.
//!
//! Walks a prototype directory, parses every `.yml` file and hands back the
//! raw records of one kind. A file that fails to parse is logged and
//! skipped; it never aborts the batch.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use walkdir::WalkDir;

use crate::error::{Result, TiledError};

use super::PrototypeKind;

/// Recursively collect prototype source files under `dir`, sorted by path.
pub fn scan_prototype_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("yml"))
        .collect();
    files.sort();
    files
}

/// Parse prototype YAML source.
///
/// Tabs are replaced with four spaces first, since prototype files in the
/// wild contain them and YAML forbids them. Tagged nodes (`!type:Foo`) are
/// replaced with null.
pub fn parse_document(source: &str) -> Result<Value> {
    let source = source.replace('\t', "    ");
    let value: Value = serde_yaml::from_str(&source).map_err(|e| TiledError::Parse {
        message: format!("Invalid YAML: {}", e),
        help: None,
    })?;
    Ok(strip_tags(value))
}

/// Replace every tagged node with null, recursively.
pub fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(_) => Value::Null,
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(strip_tags).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (strip_tags(k), strip_tags(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Pull the records of `kind` out of one parsed document.
///
/// Null entries, anchors and records of other kinds are ignored.
pub fn records_of_kind(document: Value, kind: PrototypeKind) -> Vec<Value> {
    let Value::Sequence(entries) = document else {
        return Vec::new();
    };

    entries
        .into_iter()
        .filter(|entry| {
            entry
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| t == kind.tag())
        })
        .collect()
}

/// Load every record of `kind` from all prototype files under `dir`.
pub fn load_records(dir: &Path, kind: PrototypeKind) -> Vec<Value> {
    let mut records = Vec::new();

    for path in scan_prototype_files(dir) {
        match load_file(&path) {
            Ok(document) => records.extend(records_of_kind(document, kind)),
            Err(e) => tracing::warn!(file = %path.display(), "skipping prototype file: {}", e),
        }
    }

    tracing::debug!(kind = %kind, count = records.len(), dir = %dir.display(), "loaded prototypes");
    records
}

fn load_file(path: &Path) -> Result<Value> {
    let source = fs::read_to_string(path).map_err(|e| TiledError::io(path, e))?;
    parse_document(&source)
}

/// Render a scalar YAML value as a string, the way prototype authors mean it.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_tabs_are_normalized() {
        let doc = parse_document("- type: entity\n  id: A\n  components:\n\t- type: Sprite\n").unwrap();
        let records = records_of_kind(doc, PrototypeKind::Entity);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_unknown_tags_become_null() {
        let doc = parse_document(
            "- type: entity\n  id: A\n  components:\n  - type: Foo\n    behavior: !type:DoThing\n      amount: 3\n",
        )
        .unwrap();
        let records = records_of_kind(doc, PrototypeKind::Entity);
        let component = &records[0]["components"][0];
        assert_eq!(component["behavior"], Value::Null);
        assert_eq!(component["type"], Value::String("Foo".into()));
    }

    #[test]
    fn test_records_of_kind_skips_other_kinds_and_nulls() {
        let doc = parse_document("- type: tile\n  id: floor\n-\n- type: entity\n  id: A\n").unwrap();
        assert_eq!(records_of_kind(doc.clone(), PrototypeKind::Tile).len(), 1);
        assert_eq!(records_of_kind(doc, PrototypeKind::Decal).len(), 0);
    }

    #[test]
    fn test_load_records_skips_malformed_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("good.yml"), "- type: decal\n  id: one\n").unwrap();
        fs::write(dir.path().join("nested/also.yml"), "- type: decal\n  id: two\n").unwrap();
        fs::write(dir.path().join("bad.yml"), "- type: decal\n  id: [unclosed\n").unwrap();
        fs::write(dir.path().join("ignored.txt"), "- type: decal\n  id: three\n").unwrap();

        let records = load_records(dir.path(), PrototypeKind::Decal);
        let mut ids: Vec<_> = records
            .iter()
            .filter_map(|r| r["id"].as_str())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["one", "two"]);
    }

    #[test]
    fn test_scalar_string() {
        assert_eq!(scalar_string(&Value::Bool(true)), Some("true".to_string()));
        assert_eq!(scalar_string(&serde_yaml::from_str("12").unwrap()), Some("12".to_string()));
        assert_eq!(scalar_string(&Value::Null), None);
    }
}
