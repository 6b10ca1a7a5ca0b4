//! The editable pattern: grid, history, and the single active gesture.
//!
//! A driver (canvas, script, test) feeds gestures in through [`Document`];
//! each finished gesture becomes exactly one [`EditOperation`] on the undo
//! stack. Observers hear about every committed change after it happened.

use std::collections::HashMap;
use std::fmt;

use crate::cell::Slot;
use crate::colors::Color;
use crate::edit::EditOperation;
use crate::error::{PatternError, Result};
use crate::grid::{Bounds, GridPos, GridRect, SparseGrid};
use crate::history::{EditorConfig, UndoStack};
use crate::selection::FloatingSelection;

/// Receives the positions whose content changed, after the change.
pub trait CellObserver {
    fn cells_changed(&mut self, positions: &[GridPos]);
}

impl<F> CellObserver for F
where
    F: FnMut(&[GridPos]),
{
    fn cells_changed(&mut self, positions: &[GridPos]) {
        self(positions)
    }
}

#[derive(Debug, Clone)]
enum Gesture<'p> {
    Draw(SparseGrid<'p>),
    Erase(SparseGrid<'p>),
    Move(FloatingSelection<'p>),
    Paste(FloatingSelection<'p>),
}

/// Per-color usage, as shown in a pattern key.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry<'p> {
    pub color: &'p Color,
    /// Number of occupied slots using the color.
    pub stitches: usize,
    /// Thread coverage in full-stitch units.
    pub coverage: f32,
}

pub struct Document<'p> {
    name: String,
    title: String,
    author: String,
    width: u32,
    height: u32,
    grid: SparseGrid<'p>,
    history: UndoStack<'p>,
    gesture: Option<Gesture<'p>>,
    observers: Vec<Box<dyn CellObserver + 'p>>,
    modified: bool,
}

impl<'p> Document<'p> {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, &EditorConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: &EditorConfig) -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            author: String::new(),
            width,
            height,
            grid: SparseGrid::new(),
            history: UndoStack::from_config(config),
            gesture: None,
            observers: Vec::new(),
            modified: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.modified = true;
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
        self.modified = true;
    }

    /// `(width, height)` in cells.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn grid(&self) -> &SparseGrid<'p> {
        &self.grid
    }

    /// Direct grid access for loaders and importers. Changes made here are
    /// not recorded in the history and not broadcast to observers.
    pub fn grid_mut(&mut self) -> &mut SparseGrid<'p> {
        &mut self.grid
    }

    pub fn history(&self) -> &UndoStack<'p> {
        &self.history
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn subscribe(&mut self, observer: Box<dyn CellObserver + 'p>) {
        self.observers.push(observer);
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn begin_draw(&mut self) -> Result<()> {
        self.begin(Gesture::Draw(SparseGrid::new()))
    }

    /// Adds one stitch to the current draw gesture. Nothing reaches the
    /// live grid until [`Document::end_gesture`].
    pub fn draw(&mut self, pos: GridPos, slot: Slot, color: &'p Color) -> Result<()> {
        self.check_bounds(pos)?;
        match &mut self.gesture {
            Some(Gesture::Draw(delta)) => {
                delta.cell_at(pos).add_feature(slot, color);
                Ok(())
            }
            _ => Err(PatternError::NoGesture { expected: "draw" }),
        }
    }

    /// Draws `slot` into every in-bounds cell of `rect`.
    pub fn fill_rect(&mut self, rect: GridRect, slot: Slot, color: &'p Color) -> Result<()> {
        let bounds = self.bounds();
        match &mut self.gesture {
            Some(Gesture::Draw(delta)) => {
                for pos in rect.positions().filter(|pos| bounds.contains(*pos)) {
                    delta.cell_at(pos).add_feature(slot, color);
                }
                Ok(())
            }
            _ => Err(PatternError::NoGesture { expected: "draw" }),
        }
    }

    pub fn begin_erase(&mut self) -> Result<()> {
        self.begin(Gesture::Erase(SparseGrid::new()))
    }

    /// Marks the cell at `pos` for erasure. Empty positions are ignored.
    pub fn erase(&mut self, pos: GridPos) -> Result<()> {
        self.check_bounds(pos)?;
        match &mut self.gesture {
            Some(Gesture::Erase(delta)) => {
                if self.grid.contains(pos) {
                    delta.cell_at(pos);
                }
                Ok(())
            }
            _ => Err(PatternError::NoGesture { expected: "erase" }),
        }
    }

    /// Lifts the cells inside `rect` into a floating selection.
    pub fn begin_move(&mut self, rect: GridRect) -> Result<()> {
        if self.gesture.is_some() {
            return Err(PatternError::GestureInProgress);
        }
        let selection = FloatingSelection::lift(&self.grid, rect);
        self.begin(Gesture::Move(selection))
    }

    pub fn begin_paste(&mut self, selection: FloatingSelection<'p>) -> Result<()> {
        self.begin(Gesture::Paste(selection))
    }

    pub fn drag_selection(&mut self, dx: i32, dy: i32) -> Result<()> {
        match &mut self.gesture {
            Some(Gesture::Move(selection)) | Some(Gesture::Paste(selection)) => {
                selection.translate(dx, dy);
                Ok(())
            }
            _ => Err(PatternError::NoGesture {
                expected: "selection",
            }),
        }
    }

    /// Cells collected by the active draw or erase gesture.
    pub fn pending(&self) -> Option<&SparseGrid<'p>> {
        match &self.gesture {
            Some(Gesture::Draw(delta)) | Some(Gesture::Erase(delta)) => Some(delta),
            _ => None,
        }
    }

    /// The selection being moved or pasted.
    pub fn floating(&self) -> Option<&FloatingSelection<'p>> {
        match &self.gesture {
            Some(Gesture::Move(selection)) | Some(Gesture::Paste(selection)) => Some(selection),
            _ => None,
        }
    }

    /// Discards the active gesture without touching the grid. Returns
    /// whether a gesture was active.
    pub fn cancel_gesture(&mut self) -> bool {
        self.gesture.take().is_some()
    }

    /// Commits the active gesture as one undoable operation. Returns
    /// `false` when the gesture touched nothing and no operation was recorded.
    pub fn end_gesture(&mut self) -> Result<bool> {
        let gesture = self
            .gesture
            .take()
            .ok_or(PatternError::NoGesture { expected: "active" })?;
        let bounds = self.bounds();

        let op = match gesture {
            Gesture::Draw(mut delta) => {
                delta.prune();
                EditOperation::draw(&self.grid, &delta)
            }
            Gesture::Erase(delta) => EditOperation::erase(&self.grid, &delta),
            Gesture::Move(selection) => {
                if !selection.has_moved() {
                    return Ok(false);
                }
                EditOperation::relocate(&self.grid, &selection, Some(&bounds))
            }
            Gesture::Paste(selection) => {
                EditOperation::relocate(&self.grid, &selection, Some(&bounds))
            }
        };

        if op.is_empty() {
            return Ok(false);
        }
        self.record(op);
        Ok(true)
    }

    /// Erases every occupied cell inside `rect` as one operation.
    pub fn delete_region(&mut self, rect: GridRect) -> Result<bool> {
        if self.gesture.is_some() {
            return Err(PatternError::GestureInProgress);
        }
        let mut delta = SparseGrid::new();
        for pos in rect.positions().filter(|pos| self.grid.contains(*pos)) {
            delta.cell_at(pos);
        }
        if delta.is_empty() {
            return Ok(false);
        }
        let op = EditOperation::erase(&self.grid, &delta);
        self.record(op);
        Ok(true)
    }

    pub fn undo(&mut self) -> Result<bool> {
        if self.gesture.is_some() {
            return Err(PatternError::GestureInProgress);
        }
        Ok(match self.history.undo(&mut self.grid) {
            Some(touched) => {
                self.changed(touched);
                true
            }
            None => false,
        })
    }

    pub fn redo(&mut self) -> Result<bool> {
        if self.gesture.is_some() {
            return Err(PatternError::GestureInProgress);
        }
        Ok(match self.history.redo(&mut self.grid) {
            Some(touched) => {
                self.changed(touched);
                true
            }
            None => false,
        })
    }

    /// Colors in the order they are first met scanning row-major.
    pub fn colors_in_use(&self) -> Vec<&'p Color> {
        self.legend_unsorted()
            .into_iter()
            .map(|entry| entry.color)
            .collect()
    }

    /// Usage per color, most used first.
    pub fn legend(&self) -> Vec<LegendEntry<'p>> {
        let mut entries = self.legend_unsorted();
        entries.sort_by(|a, b| b.stitches.cmp(&a.stitches));
        entries
    }

    /// Number of occupied slots across the grid.
    pub fn stitch_count(&self) -> usize {
        self.grid
            .cells()
            .map(|(_, cell)| cell.feature_mask().len())
            .sum()
    }

    fn legend_unsorted(&self) -> Vec<LegendEntry<'p>> {
        let mut entries: Vec<LegendEntry<'p>> = Vec::new();
        let mut index: HashMap<&'p Color, usize> = HashMap::new();
        for (_, cell) in self.grid.cells() {
            for (slot, color) in cell.features() {
                let i = *index.entry(color).or_insert_with(|| {
                    entries.push(LegendEntry {
                        color,
                        stitches: 0,
                        coverage: 0.0,
                    });
                    entries.len() - 1
                });
                entries[i].stitches += 1;
                entries[i].coverage += slot.weight();
            }
        }
        entries
    }

    fn begin(&mut self, gesture: Gesture<'p>) -> Result<()> {
        if self.gesture.is_some() {
            return Err(PatternError::GestureInProgress);
        }
        self.gesture = Some(gesture);
        Ok(())
    }

    fn check_bounds(&self, pos: GridPos) -> Result<()> {
        if self.bounds().contains(pos) {
            Ok(())
        } else {
            Err(PatternError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn record(&mut self, op: EditOperation<'p>) {
        let label = op.label();
        let touched = self.history.push(op, &mut self.grid);
        log::debug!("{} committed, {} cells touched", label, touched.len());
        self.changed(touched);
    }

    fn changed(&mut self, mut touched: Vec<GridPos>) {
        self.modified = true;
        touched.sort();
        touched.dedup();
        for observer in &mut self.observers {
            observer.cells_changed(&touched);
        }
    }
}

impl fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("author", &self.author)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cells", &self.grid.len())
            .field("history", &self.history.len())
            .field("gesture", &self.gesture)
            .field("observers", &self.observers.len())
            .field("modified", &self.modified)
            .finish()
    }
}
