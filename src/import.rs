//! Raster image import.
//!
//! The image is scaled to the requested pattern width and every
//! sufficiently opaque pixel becomes a full stitch of the nearest palette
//! color. Lookups run in parallel with rayon; the k-d tree is immutable
//! once built.

use std::fs;
use std::path::Path;
use std::time::Instant;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::colors::{Color, Palette};
use crate::document::Document;
use crate::error::{PatternError, Result};
use crate::grid::GridPos;
use crate::kdtree::ColorIndex;

/// Import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportConfig {
    /// Pattern width in cells; the height follows the image aspect ratio.
    pub width: u32,
    /// Pixels with alpha below this value stay empty.
    pub alpha_threshold: u8,
    /// Pixels nearest to this color stay empty.
    pub transparent: Option<[u8; 3]>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            width: 60,
            alpha_threshold: 64,
            transparent: None,
        }
    }
}

#[derive(Debug)]
pub struct ImportResult<'p> {
    pub document: Document<'p>,
    pub stitch_count: usize,
    pub processing_time_ms: u64,
}

/// Pattern height for an image of `image_width x image_height` scaled to `width` cells.
pub fn scaled_height(image_width: u32, image_height: u32, width: u32) -> u32 {
    if image_width == 0 {
        return 0;
    }
    let height = u64::from(image_height) * u64::from(width) / u64::from(image_width);
    height.clamp(1, u64::from(u32::MAX)) as u32
}

pub fn import_image<'p>(
    image: &DynamicImage,
    palette: &'p Palette,
    config: &ImportConfig,
) -> Result<ImportResult<'p>> {
    let start_time = Instant::now();

    if palette.is_empty() {
        return Err(PatternError::EmptyPalette(palette.id().to_string()));
    }
    let (image_width, image_height) = image.dimensions();
    if config.width == 0 || image_width == 0 || image_height == 0 {
        return Err(PatternError::InvalidSize {
            width: config.width,
            height: scaled_height(image_width, image_height, config.width),
        });
    }

    let width = config.width;
    let height = scaled_height(image_width, image_height, width);
    let rgba = image.to_rgba8();
    let scaled = imageops::resize(&rgba, width, height, FilterType::Triangle);

    let index = ColorIndex::from_palette(palette, config.transparent);
    let threshold = config.alpha_threshold;

    let stitches: Vec<(GridPos, &'p Color)> = scaled
        .enumerate_pixels()
        .collect::<Vec<_>>()
        .par_iter()
        .filter_map(|(x, y, pixel)| {
            if pixel[3] < threshold {
                return None;
            }
            let color = index.nearest_color([pixel[0], pixel[1], pixel[2]])?;
            Some((GridPos::new(*x as i32, *y as i32), color))
        })
        .collect();

    let mut document = Document::new(width, height);
    for &(pos, color) in &stitches {
        document.grid_mut().cell_at(pos).add_full(color);
    }

    let processing_time_ms = start_time.elapsed().as_millis() as u64;
    log::info!(
        "Imported {}x{} image as {}x{} pattern: {} stitches, {} palette colors, {}ms",
        image_width,
        image_height,
        width,
        height,
        stitches.len(),
        palette.len(),
        processing_time_ms
    );

    Ok(ImportResult {
        document,
        stitch_count: stitches.len(),
        processing_time_ms,
    })
}

pub fn import_image_bytes<'p>(
    image_bytes: &[u8],
    palette: &'p Palette,
    config: &ImportConfig,
) -> Result<ImportResult<'p>> {
    log::info!(
        "Importing image: {} bytes, width {}, palette '{}'",
        image_bytes.len(),
        config.width,
        palette.id()
    );
    let image = image::load_from_memory(image_bytes)?;
    import_image(&image, palette, config)
}

/// Imports the image at `path`; the document is named after the file stem.
pub fn import_image_from_path<'p>(
    path: impl AsRef<Path>,
    palette: &'p Palette,
    config: &ImportConfig,
) -> Result<ImportResult<'p>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| PatternError::io(path, err))?;
    let mut result = import_image_bytes(&bytes, palette, config)?;
    if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
        result.document.set_name(stem);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Slot;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn palette() -> Palette {
        let mut palette = Palette::new("test", "Test");
        palette.add(Color::new("red", "Red", [255, 0, 0]));
        palette.add(Color::new("blue", "Blue", [0, 0, 255]));
        palette.add(Color::new("white", "White", [255, 255, 255]));
        palette
    }

    /// Left half reddish, right half bluish, bottom-right pixel fully transparent.
    fn two_tone(width: u32, height: u32) -> DynamicImage {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            if x == width - 1 && y == height - 1 {
                Rgba([0, 0, 0, 0])
            } else if x < width / 2 {
                Rgba([230, 20, 10, 255])
            } else {
                Rgba([15, 10, 240, 255])
            }
        });
        DynamicImage::ImageRgba8(image)
    }

    #[test]
    fn test_scaled_height() {
        assert_eq!(scaled_height(200, 100, 60), 30);
        assert_eq!(scaled_height(1000, 1, 10), 1);
        assert_eq!(scaled_height(10, 30, 10), 30);
    }

    #[test]
    fn test_import_maps_pixels_to_nearest_colors() {
        let palette = palette();
        let config = ImportConfig {
            width: 4,
            ..ImportConfig::default()
        };
        let result = import_image(&two_tone(4, 2), &palette, &config).unwrap();
        let doc = &result.document;

        assert_eq!(doc.size(), (4, 2));
        assert_eq!(result.stitch_count, 7);
        assert_eq!(doc.grid().len(), 7);
        assert!(!doc.history().can_undo());

        let left = doc.grid().get(GridPos::new(0, 1)).unwrap();
        assert_eq!(left.color(Slot::Full).unwrap().id(), "red");
        let right = doc.grid().get(GridPos::new(2, 0)).unwrap();
        assert_eq!(right.color(Slot::Full).unwrap().id(), "blue");
        assert!(!doc.grid().contains(GridPos::new(3, 1)));
    }

    #[test]
    fn test_transparent_color_is_skipped() {
        let palette = palette();
        let image = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([250, 250, 250, 255]),
            1 => Rgba([240, 5, 5, 255]),
            _ => Rgba([255, 255, 255, 255]),
        });
        let config = ImportConfig {
            width: 3,
            transparent: Some([255, 255, 255]),
            ..ImportConfig::default()
        };
        let result = import_image(&DynamicImage::ImageRgba8(image), &palette, &config).unwrap();
        let positions: Vec<GridPos> = result.document.grid().positions().collect();
        assert_eq!(positions, vec![GridPos::new(1, 0)]);
    }

    #[test]
    fn test_downscale_keeps_aspect_ratio() {
        let palette = palette();
        let image = RgbaImage::from_pixel(40, 20, Rgba([250, 0, 0, 255]));
        let config = ImportConfig {
            width: 10,
            ..ImportConfig::default()
        };
        let result = import_image(&DynamicImage::ImageRgba8(image), &palette, &config).unwrap();
        assert_eq!(result.document.size(), (10, 5));
        assert_eq!(result.stitch_count, 50);
        assert_eq!(result.document.legend()[0].color.id(), "red");
    }

    #[test]
    fn test_import_from_encoded_bytes_and_path() {
        let palette = palette();
        let mut bytes = Vec::new();
        two_tone(4, 2)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let config = ImportConfig {
            width: 4,
            ..ImportConfig::default()
        };

        let result = import_image_bytes(&bytes, &palette, &config).unwrap();
        assert_eq!(result.stitch_count, 7);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tulip.png");
        fs::write(&path, &bytes).unwrap();
        let result = import_image_from_path(&path, &palette, &config).unwrap();
        assert_eq!(result.document.name(), "tulip");
        assert_eq!(result.document.grid().len(), 7);
    }

    #[test]
    fn test_import_errors() {
        let config = ImportConfig::default();
        let empty = Palette::new("empty", "Empty");
        assert!(matches!(
            import_image(&two_tone(4, 2), &empty, &config),
            Err(PatternError::EmptyPalette(_))
        ));

        let palette = palette();
        let zero = ImportConfig {
            width: 0,
            ..ImportConfig::default()
        };
        assert!(matches!(
            import_image(&two_tone(4, 2), &palette, &zero),
            Err(PatternError::InvalidSize { .. })
        ));
        assert!(matches!(
            import_image_bytes(b"not an image", &palette, &config),
            Err(PatternError::Image(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: ImportConfig =
            serde_json::from_str(r#"{"width": 80, "transparent": [255, 255, 255]}"#).unwrap();
        assert_eq!(config.width, 80);
        assert_eq!(config.alpha_threshold, 64);
        assert_eq!(config.transparent, Some([255, 255, 255]));
    }
}
