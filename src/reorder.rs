//! Drag-and-drop reordering within and across columns.

use crate::board_state::BoardState;
use crate::column::ColumnId;
use crate::error::Result;

/// A position on the board: column plus index into its task sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskRef {
    pub column: ColumnId,
    pub index: usize,
}

impl TaskRef {
    pub fn new(column: ColumnId, index: usize) -> Self {
        Self { column, index }
    }
}

/// The end of a drag gesture. No destination means the drag was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub source: TaskRef,
    pub destination: Option<TaskRef>,
}

impl DragEnd {
    pub fn dropped(source: TaskRef, destination: TaskRef) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    pub fn cancelled(source: TaskRef) -> Self {
        Self {
            source,
            destination: None,
        }
    }
}

impl BoardState {
    /// Moves the task at `source` to `destination`.
    ///
    /// A missing destination returns the board unchanged. The source must
    /// address an existing task; a destination index past the end of the
    /// target sequence is clamped to the end.
    pub fn move_task(&self, source: TaskRef, destination: Option<TaskRef>) -> Result<Self> {
        let Some(destination) = destination else {
            return Ok(self.clone());
        };
        self.require(source)?;

        let mut next = self.clone();
        let moved = next.column_mut(source.column).tasks.remove(source.index);
        let target = &mut next.column_mut(destination.column).tasks;
        let index = destination.index.min(target.len());
        target.insert(index, moved);
        Ok(next)
    }

    pub fn apply_drag(&self, drag: &DragEnd) -> Result<Self> {
        self.move_task(drag.source, drag.destination)
    }
}
