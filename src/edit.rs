//! Reversible edits over a [`SparseGrid`].
//!
//! Every operation captures the snapshots it needs when it is constructed;
//! `apply` and `invert` replay those snapshots and never diff against the
//! live grid. Both return the positions they touched so the owner can tell
//! observers which cells are stale.

use crate::cell::Cell;
use crate::grid::{Bounds, GridPos, SparseGrid};
use crate::selection::FloatingSelection;

/// Snapshot pair shared by draw and erase gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeEdit<'p> {
    previous: Vec<Cell<'p>>,
    drawn: Vec<Cell<'p>>,
}

impl<'p> MergeEdit<'p> {
    /// Snapshots `grid` at every position of `delta`; positions absent from
    /// `grid` are recorded as empty cells.
    pub fn capture(grid: &SparseGrid<'p>, delta: &SparseGrid<'p>) -> Self {
        let mut previous = Vec::with_capacity(delta.len());
        let mut drawn = Vec::with_capacity(delta.len());
        for (pos, cell) in delta.cells() {
            previous.push(grid.get(pos).cloned().unwrap_or_else(|| Cell::new(pos)));
            drawn.push(cell.clone());
        }
        Self { previous, drawn }
    }

    pub fn previous(&self) -> &[Cell<'p>] {
        &self.previous
    }

    pub fn drawn(&self) -> &[Cell<'p>] {
        &self.drawn
    }

    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }
}

/// Relocation of a floating selection from its origin to a target corner.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveEdit<'p> {
    origin: GridPos,
    target: GridPos,
    /// Moved cells at their source positions.
    lifted: Vec<Cell<'p>>,
    /// Moved cells at their destination positions; cells landing outside
    /// the bounds given at capture are dropped here.
    placed: Vec<Cell<'p>>,
    source_before: Vec<Cell<'p>>,
    target_before: Vec<Cell<'p>>,
}

impl<'p> MoveEdit<'p> {
    /// Snapshots source and destination content for moving `selection`
    /// from its origin to its current position. All snapshots are taken
    /// here, before anything is mutated, so overlapping regions are safe.
    /// Returns `None` for a pasted selection, which has no source.
    pub fn capture(
        grid: &SparseGrid<'p>,
        selection: &FloatingSelection<'p>,
        bounds: Option<&Bounds>,
    ) -> Option<Self> {
        let origin = selection.origin()?;
        let target = selection.position();
        let snapshot = |pos: GridPos| grid.get(pos).cloned().unwrap_or_else(|| Cell::new(pos));

        let mut lifted = Vec::with_capacity(selection.len());
        let mut placed = Vec::with_capacity(selection.len());
        let mut source_before = Vec::with_capacity(selection.len());
        let mut target_before = Vec::with_capacity(selection.len());

        for (offset, cell) in selection.cells().cells() {
            let source = origin + offset;
            let destination = target + offset;

            let mut at_source = cell.clone();
            at_source.move_to(source);
            lifted.push(at_source);
            source_before.push(snapshot(source));

            if bounds.map_or(true, |b| b.contains(destination)) {
                let mut at_target = cell.clone();
                at_target.move_to(destination);
                placed.push(at_target);
                target_before.push(snapshot(destination));
            } else {
                log::debug!(
                    "Dropping moved cell at ({}, {}): outside pattern",
                    destination.x,
                    destination.y
                );
            }
        }

        Some(Self {
            origin,
            target,
            lifted,
            placed,
            source_before,
            target_before,
        })
    }

    pub fn origin(&self) -> GridPos {
        self.origin
    }

    pub fn target(&self) -> GridPos {
        self.target
    }

    pub fn len(&self) -> usize {
        self.lifted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lifted.is_empty()
    }

    fn apply(&self, grid: &mut SparseGrid<'p>) -> Vec<GridPos> {
        let mut touched = Vec::with_capacity(self.lifted.len() + self.placed.len());
        for cell in &self.lifted {
            grid.remove(cell.pos());
            touched.push(cell.pos());
        }
        for cell in &self.placed {
            grid.merge(cell);
            touched.push(cell.pos());
        }
        touched
    }

    fn invert(&self, grid: &mut SparseGrid<'p>) -> Vec<GridPos> {
        let mut touched = Vec::with_capacity(self.source_before.len() + self.target_before.len());
        for cell in self.target_before.iter().chain(&self.source_before) {
            grid.overwrite(cell);
            touched.push(cell.pos());
        }
        for cell in &self.lifted {
            grid.merge(cell);
        }
        touched
    }
}

/// A committed, reversible edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOperation<'p> {
    Draw(MergeEdit<'p>),
    Erase(MergeEdit<'p>),
    Move(MoveEdit<'p>),
}

impl<'p> EditOperation<'p> {
    pub fn draw(grid: &SparseGrid<'p>, delta: &SparseGrid<'p>) -> Self {
        EditOperation::Draw(MergeEdit::capture(grid, delta))
    }

    /// Cells of `delta` are normally empty: erasing overwrites with them.
    pub fn erase(grid: &SparseGrid<'p>, delta: &SparseGrid<'p>) -> Self {
        EditOperation::Erase(MergeEdit::capture(grid, delta))
    }

    /// Commits `selection` at its current position. A lifted selection
    /// becomes a move; a pasted one has nothing to clear at a source and
    /// becomes a draw of its placed cells. Cells outside `bounds` are dropped.
    pub fn relocate(
        grid: &SparseGrid<'p>,
        selection: &FloatingSelection<'p>,
        bounds: Option<&Bounds>,
    ) -> Self {
        if let Some(edit) = MoveEdit::capture(grid, selection, bounds) {
            return EditOperation::Move(edit);
        }
        let mut delta = selection.placed();
        if let Some(bounds) = bounds {
            let outside: Vec<GridPos> = delta
                .positions()
                .filter(|pos| !bounds.contains(*pos))
                .collect();
            for pos in outside {
                delta.remove(pos);
            }
        }
        EditOperation::draw(grid, &delta)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditOperation::Draw(_) => "Drawing",
            EditOperation::Erase(_) => "Erasing",
            EditOperation::Move(_) => "Moving",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EditOperation::Draw(edit) | EditOperation::Erase(edit) => edit.is_empty(),
            EditOperation::Move(edit) => edit.is_empty(),
        }
    }

    pub fn apply(&self, grid: &mut SparseGrid<'p>) -> Vec<GridPos> {
        match self {
            EditOperation::Draw(edit) => merge_all(grid, &edit.drawn),
            EditOperation::Erase(edit) => overwrite_all(grid, &edit.drawn),
            EditOperation::Move(edit) => edit.apply(grid),
        }
    }

    pub fn invert(&self, grid: &mut SparseGrid<'p>) -> Vec<GridPos> {
        match self {
            EditOperation::Draw(edit) => overwrite_all(grid, &edit.previous),
            EditOperation::Erase(edit) => merge_all(grid, &edit.previous),
            EditOperation::Move(edit) => edit.invert(grid),
        }
    }
}

fn merge_all<'p>(grid: &mut SparseGrid<'p>, cells: &[Cell<'p>]) -> Vec<GridPos> {
    cells
        .iter()
        .map(|cell| {
            grid.merge(cell);
            cell.pos()
        })
        .collect()
}

fn overwrite_all<'p>(grid: &mut SparseGrid<'p>, cells: &[Cell<'p>]) -> Vec<GridPos> {
    cells
        .iter()
        .map(|cell| {
            grid.overwrite(cell);
            cell.pos()
        })
        .collect()
}
