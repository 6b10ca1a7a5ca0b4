//! Sparse cell storage.
//!
//! [`SparseGrid`] is both the live document grid and the throwaway delta
//! collected during one gesture. It performs no bounds checks; callers that
//! care about document dimensions consult a [`Bounds`] first.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Saturates at the `i32` range instead of wrapping.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

// Row-major: y first, then x.
impl Ord for GridPos {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for GridPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        self.offset(rhs.x, rhs.y)
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Axis-aligned rectangle of grid positions, `width x height` cells from
/// the top-left corner `(x, y)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        let dx = i64::from(pos.x) - i64::from(self.x);
        let dy = i64::from(pos.y) - i64::from(self.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }

    /// Every position in the rectangle, row-major. Rows and columns past
    /// the `i32` coordinate range are not yielded.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let GridRect {
            x,
            y,
            width,
            height,
        } = *self;
        span(y, height).flat_map(move |row| span(x, width).map(move |col| GridPos::new(col, row)))
    }
}

fn span(start: i32, len: u32) -> impl Iterator<Item = i32> {
    (0..i64::from(len)).map_while(move |step| i32::try_from(i64::from(start) + step).ok())
}

/// Document dimensions, used as the optional bounds predicate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        GridRect::new(0, 0, self.width, self.height).contains(pos)
    }
}

/// Mapping from position to non-empty [`Cell`].
///
/// Entries created through [`SparseGrid::cell_at`] start empty; the live
/// document grid only keeps them once a stitch is added, while delta grids
/// may hold empty cells as erase markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseGrid<'p> {
    cells: BTreeMap<GridPos, Cell<'p>>,
}

impl<'p> SparseGrid<'p> {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Returns the cell at `pos`, inserting an empty one if absent.
    pub fn cell_at(&mut self, pos: GridPos) -> &mut Cell<'p> {
        self.cells.entry(pos).or_insert_with(|| Cell::new(pos))
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell<'p>> {
        self.cells.get(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Replaces the content at `cell.pos()` with a copy of `cell`, or
    /// removes the entry when `cell` is empty.
    pub fn overwrite(&mut self, cell: &Cell<'p>) -> Option<&mut Cell<'p>> {
        let pos = cell.pos();
        if cell.is_empty() {
            self.cells.remove(&pos);
            return None;
        }
        self.cells.insert(pos, cell.clone());
        self.cells.get_mut(&pos)
    }

    /// Merges `cell` into the entry at its position, or inserts a copy.
    /// An empty `cell` never creates an entry.
    pub fn merge(&mut self, cell: &Cell<'p>) -> Option<&mut Cell<'p>> {
        match self.cells.entry(cell.pos()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.merge(cell);
                Some(existing)
            }
            Entry::Vacant(_) if cell.is_empty() => None,
            Entry::Vacant(entry) => Some(entry.insert(cell.clone())),
        }
    }

    pub fn remove(&mut self, pos: GridPos) -> Option<Cell<'p>> {
        self.cells.remove(&pos)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, &Cell<'p>)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.cells.keys().copied()
    }

    /// Drops every empty entry.
    pub fn prune(&mut self) {
        self.cells.retain(|_, cell| !cell.is_empty());
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
