//! Immutable board snapshot and the task mutators.
//!
//! Every mutator borrows the current snapshot and returns a new one, so a
//! caller holding the previous `BoardState` never observes a change.

use crate::column::{Column, ColumnId};
use crate::error::{BoardError, Result, StorageError};
use crate::reorder::TaskRef;
use crate::task::{IdSource, Task, TaskDraft, TaskField, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// All four columns and their ordered tasks.
///
/// Serialized as the `{ "<column-id>": { name, tasks } }` map; deserializing
/// rejects a map with missing columns or repeated task ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<ColumnId, Column>",
    into = "BTreeMap<ColumnId, Column>"
)]
pub struct BoardState {
    columns: [Column; 4],
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            columns: ColumnId::ALL.map(Column::empty),
        }
    }
}

impl TryFrom<BTreeMap<ColumnId, Column>> for BoardState {
    type Error = StorageError;

    fn try_from(mut map: BTreeMap<ColumnId, Column>) -> std::result::Result<Self, Self::Error> {
        let mut columns = Vec::with_capacity(ColumnId::ALL.len());
        for id in ColumnId::ALL {
            columns.push(
                map.remove(&id)
                    .ok_or_else(|| StorageError::missing_column(id))?,
            );
        }

        {
            let mut seen = HashSet::new();
            for task in columns.iter().flat_map(|c| &c.tasks) {
                if !seen.insert(&task.id) {
                    return Err(StorageError::duplicate_task(&task.id));
                }
            }
        }

        let columns: [Column; 4] = columns
            .try_into()
            .map_err(|_| StorageError::malformed("wrong number of columns"))?;
        Ok(Self { columns })
    }
}

impl From<BoardState> for BTreeMap<ColumnId, Column> {
    fn from(state: BoardState) -> Self {
        ColumnId::ALL.into_iter().zip(state.columns).collect()
    }
}

impl BoardState {
    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.position()]
    }

    pub(crate) fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[id.position()]
    }

    /// Columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &Column)> {
        ColumnId::ALL.into_iter().zip(self.columns.iter())
    }

    pub fn task(&self, at: TaskRef) -> Option<&Task> {
        self.column(at.column).tasks.get(at.index)
    }

    pub fn total_hours(&self, id: ColumnId) -> u64 {
        self.column(id).total_hours()
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.columns
            .iter()
            .flat_map(|c| &c.tasks)
            .any(|t| &t.id == id)
    }

    pub(crate) fn require(&self, at: TaskRef) -> Result<&Task> {
        self.task(at).ok_or(BoardError::TaskNotFound {
            column: at.column,
            index: at.index,
        })
    }

    fn map_task(&self, at: TaskRef, f: impl FnOnce(&Task) -> Task) -> Result<Self> {
        let updated = f(self.require(at)?);
        let mut next = self.clone();
        next.column_mut(at.column).tasks[at.index] = updated;
        Ok(next)
    }

    /// Appends a task built from `draft` to "Due Today".
    ///
    /// An empty title leaves the board and draft as they are. Otherwise the
    /// returned draft is empty, ready for the creation form.
    pub fn add_task(&self, draft: &TaskDraft, ids: &mut impl IdSource) -> (Self, TaskDraft) {
        if draft.title.is_empty() {
            return (self.clone(), draft.clone());
        }

        let id = loop {
            let id = ids.next_id();
            if !self.contains_task(&id) {
                break id;
            }
        };

        let mut next = self.clone();
        next.column_mut(ColumnId::DueToday)
            .tasks
            .push(draft.clone().into_task(id));
        (next, TaskDraft::default())
    }

    /// Puts the task into edit mode; already-editing tasks are left alone.
    pub fn begin_edit(&self, at: TaskRef) -> Result<Self> {
        if self.require(at)?.is_editing {
            return Ok(self.clone());
        }
        self.map_task(at, |task| Task {
            is_editing: true,
            ..task.clone()
        })
    }

    pub fn update_field(&self, at: TaskRef, field: TaskField, raw: &str) -> Result<Self> {
        self.map_task(at, |task| task.with_field(field, raw))
    }

    pub fn finish_edit(&self, at: TaskRef) -> Result<Self> {
        self.map_task(at, |task| Task {
            is_editing: false,
            ..task.clone()
        })
    }

    /// Flips completion and relocates the task.
    ///
    /// Newly completed tasks go to the front of "Completed"; reopened tasks
    /// go to the back of "Due Today" whatever column they came from.
    pub fn toggle_complete(&self, at: TaskRef) -> Result<Self> {
        let current = self.require(at)?;
        let toggled = Task {
            completed: !current.completed,
            ..current.clone()
        };

        let mut next = self.clone();
        next.column_mut(at.column).tasks.remove(at.index);
        if toggled.completed {
            next.column_mut(ColumnId::Completed).tasks.insert(0, toggled);
        } else {
            next.column_mut(ColumnId::DueToday).tasks.push(toggled);
        }
        Ok(next)
    }
}
