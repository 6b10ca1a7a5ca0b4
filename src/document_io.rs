//! JSON document format, version 1.
//!
//! ```json
//! {"version": 1,
//!  "data": {"rows": 20, "columns": 30, "title": "", "author": "",
//!           "colors": [{"category": "dmc", "id": "310", "name": "Black", "color": "#000000"}],
//!           "stitches": [{"x": 3, "y": 4, "features": [["dmc", "310", 0]]}]}}
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cell::Slot;
use crate::colors::{Color, PaletteSet};
use crate::document::Document;
use crate::error::{PatternError, Result};
use crate::grid::GridPos;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentData {
    rows: u32,
    columns: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    colors: Vec<ColorEntry>,
    stitches: Option<Vec<StitchRecord>>,
}

/// Informational; loading resolves colors through the palette set.
#[derive(Debug, Serialize, Deserialize)]
struct ColorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    id: String,
    name: String,
    color: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StitchRecord {
    x: i32,
    y: i32,
    /// `(category, id, slot)` triples.
    #[serde(default)]
    features: Vec<(Option<String>, String, u32)>,
}

fn category_of(color: &Color) -> Option<String> {
    match color.category() {
        "" => None,
        category => Some(category.to_string()),
    }
}

pub fn document_to_json(doc: &Document<'_>) -> Result<String> {
    let (columns, rows) = doc.size();
    let colors = doc
        .colors_in_use()
        .into_iter()
        .map(|color| ColorEntry {
            category: category_of(color),
            id: color.id().to_string(),
            name: color.name().to_string(),
            color: color.hex(),
        })
        .collect();
    let stitches = doc
        .grid()
        .cells()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(pos, cell)| StitchRecord {
            x: pos.x,
            y: pos.y,
            features: cell
                .features()
                .map(|(slot, color)| {
                    (category_of(color), color.id().to_string(), slot.index() as u32)
                })
                .collect(),
        })
        .collect();

    let data = DocumentData {
        rows,
        columns,
        title: doc.title().to_string(),
        author: doc.author().to_string(),
        colors,
        stitches: Some(stitches),
    };
    let envelope = Envelope {
        version: FORMAT_VERSION,
        data: serde_json::to_value(data)?,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parses a document, resolving colors through `palettes`. Stitches with
/// unknown colors, bad slot indices, or positions outside the pattern are
/// skipped with a warning.
pub fn document_from_json<'p>(text: &str, palettes: &'p PaletteSet) -> Result<Document<'p>> {
    let envelope: Envelope = serde_json::from_str(text)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PatternError::UnsupportedVersion(envelope.version));
    }
    let data: DocumentData = serde_json::from_value(envelope.data)?;
    if data.columns == 0 || data.rows == 0 {
        return Err(PatternError::InvalidSize {
            width: data.columns,
            height: data.rows,
        });
    }
    let stitches = data.stitches.ok_or(PatternError::MissingStitches)?;

    let mut doc = Document::new(data.columns, data.rows);
    doc.set_title(data.title);
    doc.set_author(data.author);
    let bounds = doc.bounds();

    let mut skipped = 0usize;
    for record in &stitches {
        let pos = GridPos::new(record.x, record.y);
        if !bounds.contains(pos) {
            log::warn!("Skipping stitch at ({}, {}): outside the pattern", pos.x, pos.y);
            skipped += 1;
            continue;
        }
        for (category, id, index) in &record.features {
            let Some(slot) = Slot::from_index(*index as usize) else {
                log::warn!("Skipping stitch at ({}, {}): invalid slot {}", pos.x, pos.y, index);
                skipped += 1;
                continue;
            };
            let Some(color) = resolve_color(palettes, category.as_deref(), id) else {
                log::warn!(
                    "Skipping stitch at ({}, {}): unknown color {}/{}",
                    pos.x,
                    pos.y,
                    category.as_deref().unwrap_or("-"),
                    id
                );
                skipped += 1;
                continue;
            };
            doc.grid_mut().cell_at(pos).add_feature(slot, color);
        }
    }
    doc.grid_mut().prune();

    log::debug!(
        "Loaded {}x{} document with {} cells ({} stitches skipped)",
        data.columns,
        data.rows,
        doc.grid().len(),
        skipped
    );
    doc.mark_saved();
    Ok(doc)
}

/// Colors saved without a category are looked up in every palette, first match wins.
fn resolve_color<'p>(
    palettes: &'p PaletteSet,
    category: Option<&str>,
    id: &str,
) -> Option<&'p Color> {
    match category {
        Some(category) => palettes.get(category, id),
        None => palettes.iter().find_map(|palette| palette.get(id)),
    }
}

pub fn load_document<'p>(path: impl AsRef<Path>, palettes: &'p PaletteSet) -> Result<Document<'p>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| PatternError::io(path, err))?;
    let mut doc = document_from_json(&text, palettes)?;
    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        doc.set_name(name);
    }
    log::info!("Loaded document {}", path.display());
    Ok(doc)
}

/// Writes `doc` to `path` through a temporary sibling file, then marks it saved.
pub fn save_document(doc: &mut Document<'_>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let payload = document_to_json(doc)?;
    write_atomically(path, payload.as_bytes())?;

    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        doc.set_name(name);
    }
    doc.mark_saved();
    log::info!("Saved document {} ({} cells)", path.display(), doc.grid().len());
    Ok(())
}

/// The document is first written and synced to `.<name>.partial` next to
/// `path`, then renamed over it, so a failed save leaves the previous file
/// intact. The partial file is removed when the rename fails.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| PatternError::io(dir, err))?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let partial = dir.join(format!(".{name}.partial"));

    let written = File::create(&partial).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|()| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(PatternError::io(path, err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Orientation, Subarea};
    use crate::colors::Palette;

    fn palettes() -> PaletteSet {
        let mut mine = Palette::new("mine", "Mine");
        mine.add(Color::new("sky", "Sky", [120, 180, 250]));
        let mut set = PaletteSet::with_dmc();
        set.add(mine);
        set
    }

    fn sample<'p>(set: &'p PaletteSet) -> Document<'p> {
        let black = set.get("dmc", "310").unwrap();
        let sky = set.get("mine", "sky").unwrap();
        let mut doc = Document::new(12, 8);
        doc.set_title("Sampler");
        doc.set_author("M. Stitcher");
        doc.grid_mut().cell_at(GridPos::new(0, 0)).add_full(black);
        doc.grid_mut()
            .cell_at(GridPos::new(5, 3))
            .add_half(Orientation::Slash, sky);
        doc.grid_mut()
            .cell_at(GridPos::new(5, 3))
            .add_petite(Subarea::TopLeft, black);
        doc.grid_mut()
            .cell_at(GridPos::new(11, 7))
            .add_quarter(Orientation::Backslash, Subarea::BottomRight, sky);
        doc
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let set = palettes();
        let mut doc = sample(&set);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sampler.json");

        save_document(&mut doc, &path).unwrap();
        assert!(!doc.is_modified());
        assert_eq!(doc.name(), "sampler.json");

        let loaded = load_document(&path, &set).unwrap();
        assert_eq!(loaded.size(), (12, 8));
        assert_eq!(loaded.title(), "Sampler");
        assert_eq!(loaded.author(), "M. Stitcher");
        assert_eq!(loaded.grid(), doc.grid());
        assert!(!loaded.is_modified());
        assert!(!loaded.history().can_undo());

        // No temp files left behind.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let set = palettes();
        let mut doc = sample(&set);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pattern.json");
        save_document(&mut doc, &path).unwrap();
        doc.set_title("Second");
        save_document(&mut doc, &path).unwrap();
        assert_eq!(load_document(&path, &set).unwrap().title(), "Second");
    }

    #[test]
    fn test_failed_save_cleans_up_partial_file() {
        let set = palettes();
        let mut doc = sample(&set);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pattern.json");
        save_document(&mut doc, &path).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("pattern.json")]);

        // Renaming a file over a non-empty directory fails.
        let blocked = dir.path().join("blocked");
        fs::create_dir_all(blocked.join("inner")).unwrap();
        assert!(matches!(
            save_document(&mut doc, &blocked),
            Err(PatternError::Io { .. })
        ));
        assert!(!dir.path().join(".blocked.partial").exists());
        assert!(blocked.join("inner").is_dir());
    }

    #[test]
    fn test_json_layout() {
        let set = palettes();
        let doc = sample(&set);
        let value: Value = serde_json::from_str(&document_to_json(&doc).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["data"]["rows"], 8);
        assert_eq!(value["data"]["columns"], 12);
        assert_eq!(value["data"]["colors"][0]["id"], "310");
        assert_eq!(value["data"]["colors"][0]["color"], "#000000");
        assert_eq!(value["data"]["stitches"][0]["x"], 0);
        assert_eq!(
            value["data"]["stitches"][0]["features"][0],
            serde_json::json!(["dmc", "310", 0])
        );
    }

    #[test]
    fn test_edge_positions_are_kept() {
        let set = palettes();
        let text = r#"{"version": 1, "data": {"rows": 3, "columns": 3,
            "stitches": [{"x": 0, "y": 0, "features": [["dmc", "310", 0]]},
                         {"x": 2, "y": 0, "features": [[null, "sky", 1]]}]}}"#;
        let doc = document_from_json(text, &set).unwrap();
        assert!(doc.grid().contains(GridPos::new(0, 0)));
        let cell = doc.grid().get(GridPos::new(2, 0)).unwrap();
        assert_eq!(cell.color(Slot::HalfSlash).unwrap().category(), "mine");
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let set = palettes();
        let text = r#"{"version": 1, "data": {"rows": 3, "columns": 3,
            "stitches": [{"x": 5, "y": 1, "features": [["dmc", "310", 0]]},
                         {"x": 1, "y": 1, "features": [["dmc", "nope", 0], ["dmc", "310", 99]]},
                         {"x": 1, "y": 2, "features": [["dmc", "310", 3]]}]}}"#;
        let doc = document_from_json(text, &set).unwrap();
        let positions: Vec<GridPos> = doc.grid().positions().collect();
        assert_eq!(positions, vec![GridPos::new(1, 2)]);
    }

    #[test]
    fn test_empty_stitch_list_is_accepted() {
        let set = palettes();
        let text = r#"{"version": 1, "data": {"rows": 2, "columns": 2, "stitches": []}}"#;
        let doc = document_from_json(text, &set).unwrap();
        assert!(doc.grid().is_empty());
    }

    #[test]
    fn test_load_errors() {
        let set = palettes();
        assert!(matches!(
            document_from_json("{not json", &set),
            Err(PatternError::Json(_))
        ));
        assert!(matches!(
            document_from_json(r#"{"version": 2, "data": {}}"#, &set),
            Err(PatternError::UnsupportedVersion(2))
        ));
        assert!(matches!(
            document_from_json(
                r#"{"version": 1, "data": {"rows": 0, "columns": 4, "stitches": []}}"#,
                &set
            ),
            Err(PatternError::InvalidSize { width: 4, height: 0 })
        ));
        assert!(matches!(
            document_from_json(r#"{"version": 1, "data": {"rows": 2, "columns": 2}}"#, &set),
            Err(PatternError::MissingStitches)
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_document(dir.path().join("missing.json"), &set),
            Err(PatternError::Io { .. })
        ));
    }
}
