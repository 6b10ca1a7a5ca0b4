//! Error types shared by the document, palette, and import layers.
//!
//! Grid, cell, and undo primitives never fail; everything here comes from
//! I/O, parsing, or a driver breaking the one-gesture-at-a-time rule.

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::GridPos;

#[derive(Debug, Error)]
pub enum PatternError {
    /// A second gesture was started, or undo/redo was requested mid-gesture.
    #[error("another editing gesture is already in progress")]
    GestureInProgress,
    /// The gesture operation does not match the active gesture (or none is active).
    #[error("no {expected} gesture is in progress")]
    NoGesture { expected: &'static str },
    #[error("position ({}, {}) is outside the {width}x{height} pattern", .pos.x, .pos.y)]
    OutOfBounds {
        pos: GridPos,
        width: u32,
        height: u32,
    },
    #[error("Could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported document version {0}")]
    UnsupportedVersion(u32),
    #[error("Invalid document size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("No stitch data")]
    MissingStitches,
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Palette '{0}' has no colors")]
    EmptyPalette(String),
}

impl PatternError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PatternError>;
