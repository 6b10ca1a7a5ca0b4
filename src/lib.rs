//! Cross-stitch pattern editing core.
//!
//! A pattern is a sparse grid of [`Cell`]s, each holding up to fifteen
//! partial stitches that exclude one another by a fixed rule table. Edits go
//! through a [`Document`], which turns every gesture into one reversible
//! [`EditOperation`] on a bounded undo stack. Images can be imported by
//! nearest-color matching against a [`Palette`].
//!
//! The crate logs through the `log` facade and installs no logger.

pub mod cell;
pub mod colors;
mod dmc;
pub mod document;
pub mod document_io;
pub mod edit;
pub mod error;
pub mod grid;
pub mod history;
pub mod import;
pub mod kdtree;
pub mod selection;

pub use cell::{Cell, Orientation, Slot, SlotSet, Subarea};
pub use colors::{Color, Palette, PaletteSet};
pub use dmc::DMC_PALETTE_ID;
pub use document::{CellObserver, Document, LegendEntry};
pub use document_io::{document_from_json, document_to_json, load_document, save_document};
pub use edit::EditOperation;
pub use error::{PatternError, Result};
pub use grid::{Bounds, GridPos, GridRect, SparseGrid};
pub use history::{EditorConfig, UndoStack};
pub use import::{
    import_image, import_image_bytes, import_image_from_path, ImportConfig, ImportResult,
};
pub use kdtree::{ColorIndex, Nearest};
pub use selection::FloatingSelection;
