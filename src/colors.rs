//! Thread colors and the palettes that own them.
//!
//! Cells and the color index only ever hold `&Color` borrowed from a
//! [`Palette`]; the palette set therefore has to outlive every document
//! built on top of it.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use palette::Srgb;
use serde::Deserialize;

use crate::error::{PatternError, Result};

/// A single thread color. Identity is `(category, id)`; the name and RGB
/// value are display data.
#[derive(Clone)]
pub struct Color {
    category: String,
    id: String,
    name: String,
    rgb: Srgb<u8>,
}

impl Color {
    /// Creates a free-standing color. Adding it to a [`Palette`] sets its category.
    pub fn new(id: impl Into<String>, name: impl Into<String>, rgb: [u8; 3]) -> Self {
        Self {
            category: String::new(),
            id: id.into(),
            name: name.into(),
            rgb: Srgb::new(rgb[0], rgb[1], rgb[2]),
        }
    }

    /// Parses `#RRGGBB` (or `RRGGBB`) into a free-standing color.
    pub fn from_hex(id: impl Into<String>, name: impl Into<String>, hex: &str) -> Result<Self> {
        let rgb = parse_hex(hex)?;
        Ok(Self::new(id, name, rgb))
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Owning palette id, empty for colors outside any palette.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn red(&self) -> u8 {
        self.rgb.red
    }

    pub fn green(&self) -> u8 {
        self.rgb.green
    }

    pub fn blue(&self) -> u8 {
        self.rgb.blue
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.rgb.red, self.rgb.green, self.rgb.blue]
    }

    pub fn hex(&self) -> String {
        rgb_to_hex(self.rgb())
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.id == other.id
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({}/{} {})", self.category, self.id, self.hex())
    }
}

/// Parse a hex color string into an RGB triple.
pub fn parse_hex(hex: &str) -> Result<[u8; 3]> {
    let rgb = Srgb::<u8>::from_str(hex.trim()).map_err(|err| PatternError::InvalidColor {
        value: hex.to_string(),
        reason: err.to_string(),
    })?;
    Ok([rgb.red, rgb.green, rgb.blue])
}

/// Formats `rgb` as an uppercase `#RRGGBB` string.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// One record of a palette table on disk. Either `color` or the three
/// channel fields must be present.
#[derive(Debug, Deserialize)]
struct ColorRecord {
    id: String,
    name: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    red: Option<u8>,
    #[serde(default)]
    green: Option<u8>,
    #[serde(default)]
    blue: Option<u8>,
}

impl ColorRecord {
    fn into_color(self) -> Result<Color> {
        let rgb = match (self.color.as_deref(), self.red, self.green, self.blue) {
            (Some(hex), _, _, _) => parse_hex(hex)?,
            (None, Some(r), Some(g), Some(b)) => [r, g, b],
            _ => {
                return Err(PatternError::InvalidColor {
                    value: self.id,
                    reason: "record has neither a hex color nor red/green/blue".to_string(),
                })
            }
        };
        Ok(Color::new(self.id, self.name, rgb))
    }
}

/// An ordered color table with lookup by id.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    id: String,
    name: String,
    colors: Vec<Color>,
    by_id: HashMap<String, usize>,
}

impl Palette {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            colors: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Loads a JSON array of `{id, name, red, green, blue}` or
    /// `{id, name, color: "#RRGGBB"}` records.
    pub fn from_json(id: impl Into<String>, name: impl Into<String>, text: &str) -> Result<Self> {
        let records: Vec<ColorRecord> = serde_json::from_str(text)?;
        let mut palette = Self::new(id, name);
        for record in records {
            palette.add(record.into_color()?);
        }
        log::debug!(
            "Loaded palette '{}' with {} colors",
            palette.id,
            palette.len()
        );
        Ok(palette)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends `color` unless its id is already present. Returns whether it was added.
    pub fn add(&mut self, color: Color) -> bool {
        let before = self.colors.len();
        self.insert(color, before)
    }

    /// Inserts `color` before position `before` (clamped to the end) unless
    /// its id is already present.
    pub fn insert(&mut self, color: Color, before: usize) -> bool {
        if self.by_id.contains_key(color.id()) {
            return false;
        }
        let before = before.min(self.colors.len());
        self.colors
            .insert(before, color.with_category(self.id.clone()));
        self.reindex();
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Color> {
        let index = self.by_id.get(id).copied()?;
        let removed = self.colors.remove(index);
        self.reindex();
        Some(removed)
    }

    /// Swaps two entries; out-of-range indices leave the palette untouched.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a >= self.colors.len() || b >= self.colors.len() {
            return;
        }
        self.colors.swap(a, b);
        self.reindex();
    }

    pub fn get(&self, id: &str) -> Option<&Color> {
        self.by_id.get(id).map(|&index| &self.colors[index])
    }

    pub fn item_at(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn clear(&mut self) {
        self.colors.clear();
        self.by_id.clear();
    }

    fn reindex(&mut self) {
        self.by_id = self
            .colors
            .iter()
            .enumerate()
            .map(|(index, color)| (color.id().to_string(), index))
            .collect();
    }
}

/// Registry of palettes keyed by palette id, used to resolve the
/// `(category, id)` pairs stored in documents and clipboard payloads.
#[derive(Debug, Clone, Default)]
pub struct PaletteSet {
    palettes: Vec<Palette>,
}

impl PaletteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding only the built-in DMC palette.
    pub fn with_dmc() -> Self {
        let mut set = Self::new();
        set.add(Palette::dmc());
        set
    }

    /// Registers `palette`, replacing any palette with the same id.
    pub fn add(&mut self, palette: Palette) {
        if let Some(existing) = self.palettes.iter_mut().find(|p| p.id() == palette.id()) {
            *existing = palette;
        } else {
            self.palettes.push(palette);
        }
    }

    pub fn palette(&self, id: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.id() == id)
    }

    pub fn get(&self, category: &str, id: &str) -> Option<&Color> {
        self.palette(category)?.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_conversion() {
        assert_eq!(parse_hex("#FF0000").unwrap(), [255, 0, 0]);
        assert_eq!(parse_hex("00ff00").unwrap(), [0, 255, 0]);
        assert_eq!(rgb_to_hex([255, 128, 0]), "#FF8000");
        assert!(parse_hex("#zz0000").is_err());
    }

    #[test]
    fn test_color_identity_ignores_display_data() {
        let a = Color::new("310", "Black", [0, 0, 0]).with_category("dmc");
        let b = Color::new("310", "Jet", [1, 1, 1]).with_category("dmc");
        let c = Color::new("310", "Black", [0, 0, 0]).with_category("anchor");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_palette_add_insert_remove_swap() {
        let mut palette = Palette::new("mine", "My Colors");
        assert!(palette.add(Color::new("a", "A", [1, 2, 3])));
        assert!(palette.add(Color::new("b", "B", [4, 5, 6])));
        assert!(!palette.add(Color::new("a", "Again", [9, 9, 9])));
        assert!(palette.insert(Color::new("c", "C", [7, 8, 9]), 0));

        let ids: Vec<&str> = palette.iter().map(Color::id).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(palette.get("a").unwrap().category(), "mine");

        palette.swap(0, 2);
        assert_eq!(palette.item_at(0).unwrap().id(), "b");
        assert_eq!(palette.get("c").unwrap().id(), "c");
        palette.swap(0, 7);
        assert_eq!(palette.item_at(0).unwrap().id(), "b");

        assert!(palette.remove("a").is_some());
        assert!(palette.get("a").is_none());
        assert_eq!(palette.get("c"), palette.item_at(1));
    }

    #[test]
    fn test_palette_from_json_accepts_both_record_shapes() {
        let json = r##"[
            {"id": "1", "name": "Red", "red": 255, "green": 0, "blue": 0},
            {"id": "2", "name": "Blue", "color": "#0000FF"}
        ]"##;
        let palette = Palette::from_json("test", "Test", json).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get("1").unwrap().rgb(), [255, 0, 0]);
        assert_eq!(palette.get("2").unwrap().hex(), "#0000FF");

        let broken = r#"[{"id": "3", "name": "Nothing"}]"#;
        assert!(Palette::from_json("test", "Test", broken).is_err());
    }

    #[test]
    fn test_palette_set_resolves_category_and_id() {
        let mut set = PaletteSet::with_dmc();
        let mut mine = Palette::new("mine", "My Colors");
        mine.add(Color::new("310", "Not black", [10, 10, 10]));
        set.add(mine);

        assert_eq!(set.get("dmc", "310").unwrap().name(), "Black");
        assert_eq!(set.get("mine", "310").unwrap().name(), "Not black");
        assert!(set.get("anchor", "310").is_none());
    }
}
