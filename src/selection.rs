//! Floating selections: a block of cells detached from the grid while the
//! user drags it, plus the clipboard payload used for copy and paste.

use serde::{Deserialize, Serialize};

use crate::cell::Slot;
use crate::colors::PaletteSet;
use crate::error::Result;
use crate::grid::{GridPos, GridRect, SparseGrid};

/// Cells kept in coordinates relative to the selection's top-left corner.
///
/// A selection lifted from a grid remembers where it came from (`origin`)
/// and commits as a move; a pasted one has no origin and commits as a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingSelection<'p> {
    origin: Option<GridPos>,
    position: GridPos,
    width: u32,
    height: u32,
    cells: SparseGrid<'p>,
}

impl<'p> FloatingSelection<'p> {
    /// Copies the non-empty cells of `rect` out of `grid`. The grid itself
    /// is left untouched until the move is committed.
    pub fn lift(grid: &SparseGrid<'p>, rect: GridRect) -> Self {
        let top_left = rect.top_left();
        let mut cells = SparseGrid::new();
        for pos in rect.positions() {
            if let Some(cell) = grid.get(pos).filter(|cell| !cell.is_empty()) {
                let mut copy = cell.clone();
                copy.move_to(pos - top_left);
                cells.overwrite(&copy);
            }
        }
        Self {
            origin: Some(top_left),
            position: top_left,
            width: rect.width,
            height: rect.height,
            cells,
        }
    }

    /// A selection with no source, placed at `position`. Cells must already
    /// be in relative coordinates.
    pub fn pasted(position: GridPos, width: u32, height: u32, cells: SparseGrid<'p>) -> Self {
        Self {
            origin: None,
            position,
            width,
            height,
            cells,
        }
    }

    pub fn origin(&self) -> Option<GridPos> {
        self.origin
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn rect(&self) -> GridRect {
        GridRect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn cells(&self) -> &SparseGrid<'p> {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }

    pub fn move_to(&mut self, position: GridPos) {
        self.position = position;
    }

    pub fn has_moved(&self) -> bool {
        self.origin != Some(self.position)
    }

    /// The cells at their current absolute positions.
    pub fn placed(&self) -> SparseGrid<'p> {
        let mut placed = SparseGrid::new();
        for (offset, cell) in self.cells.cells() {
            let mut copy = cell.clone();
            copy.move_to(self.position + offset);
            placed.overwrite(&copy);
        }
        placed
    }

    /// Serializes the selection for the clipboard.
    pub fn to_clipboard(&self) -> Result<String> {
        let payload = ClipboardPayload {
            x: self.position.x,
            y: self.position.y,
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .cells()
                .map(|(pos, cell)| ClipboardCell {
                    x: pos.x,
                    y: pos.y,
                    features: cell
                        .features()
                        .map(|(slot, color)| {
                            (
                                slot.index() as u32,
                                color.category().to_string(),
                                color.id().to_string(),
                            )
                        })
                        .collect(),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&payload)?)
    }

    /// Rebuilds a pasted selection from clipboard text. Features whose
    /// color or slot cannot be resolved are skipped.
    pub fn from_clipboard(text: &str, palettes: &'p PaletteSet) -> Result<Self> {
        let payload: ClipboardPayload = serde_json::from_str(text)?;
        let mut cells = SparseGrid::new();
        for record in &payload.cells {
            let pos = GridPos::new(record.x, record.y);
            for (index, category, id) in &record.features {
                let Some(slot) = Slot::from_index(*index as usize) else {
                    log::warn!("Skipping clipboard stitch with invalid slot {}", index);
                    continue;
                };
                let Some(color) = palettes.get(category, id) else {
                    log::warn!("Skipping clipboard stitch with unknown color {}/{}", category, id);
                    continue;
                };
                cells.cell_at(pos).add_feature(slot, color);
            }
        }
        cells.prune();

        Ok(Self::pasted(
            GridPos::new(payload.x, payload.y),
            payload.width,
            payload.height,
            cells,
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ClipboardPayload {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    cells: Vec<ClipboardCell>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClipboardCell {
    x: i32,
    y: i32,
    /// `(slot, category, id)` triples.
    features: Vec<(u32, String, String)>,
}
