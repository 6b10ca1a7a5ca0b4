use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::edit::EditOperation;
use crate::grid::{GridPos, SparseGrid};

pub const DEFAULT_UNDO_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

/// Bounded undo history. The oldest entry is discarded once `limit` is
/// exceeded; that is a resource bound, not an error.
#[derive(Debug, Clone)]
pub struct UndoStack<'p> {
    done: VecDeque<EditOperation<'p>>,
    undone: Vec<EditOperation<'p>>,
    limit: usize,
}

impl<'p> UndoStack<'p> {
    pub fn new(limit: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.undo_limit)
    }

    /// Applies `op` to `grid` and records it. Anything that was undone is
    /// no longer redoable afterwards.
    pub fn push(&mut self, op: EditOperation<'p>, grid: &mut SparseGrid<'p>) -> Vec<GridPos> {
        let touched = op.apply(grid);
        self.undone.clear();
        self.done.push_back(op);
        self.enforce_limit();
        touched
    }

    pub fn undo(&mut self, grid: &mut SparseGrid<'p>) -> Option<Vec<GridPos>> {
        let op = self.done.pop_back()?;
        let touched = op.invert(grid);
        log::debug!("Undo {} ({} cells)", op.label(), touched.len());
        self.undone.push(op);
        Some(touched)
    }

    pub fn redo(&mut self, grid: &mut SparseGrid<'p>) -> Option<Vec<GridPos>> {
        let op = self.undone.pop()?;
        let touched = op.apply(grid);
        log::debug!("Redo {} ({} cells)", op.label(), touched.len());
        self.done.push_back(op);
        Some(touched)
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Label of the operation `undo` would revert.
    pub fn undo_label(&self) -> Option<&'static str> {
        self.done.back().map(EditOperation::label)
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.undone.last().map(EditOperation::label)
    }

    /// Number of undoable operations.
    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.enforce_limit();
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    fn enforce_limit(&mut self) {
        while self.done.len() > self.limit {
            if let Some(dropped) = self.done.pop_front() {
                log::debug!(
                    "Undo limit {} reached, dropping oldest {}",
                    self.limit,
                    dropped.label()
                );
            }
        }
    }
}

impl Default for UndoStack<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}
