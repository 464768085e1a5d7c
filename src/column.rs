use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four fixed columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnId {
    DueToday,
    DueTomorrow,
    Later,
    Completed,
}

impl ColumnId {
    pub const ALL: [ColumnId; 4] = [
        ColumnId::DueToday,
        ColumnId::DueTomorrow,
        ColumnId::Later,
        ColumnId::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::DueToday => "due-today",
            ColumnId::DueTomorrow => "due-tomorrow",
            ColumnId::Later => "later",
            ColumnId::Completed => "completed",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ColumnId::DueToday => "Due Today",
            ColumnId::DueTomorrow => "Due Tomorrow",
            ColumnId::Later => "Later",
            ColumnId::Completed => "Completed",
        }
    }

    /// Position in display order.
    pub fn position(self) -> usize {
        match self {
            ColumnId::DueToday => 0,
            ColumnId::DueTomorrow => 1,
            ColumnId::Later => 2,
            ColumnId::Completed => 3,
        }
    }

    pub fn left(self) -> Self {
        Self::ALL[self.position().saturating_sub(1)]
    }

    pub fn right(self) -> Self {
        Self::ALL[(self.position() + 1).min(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn empty(id: ColumnId) -> Self {
        Self {
            name: id.display_name().to_string(),
            tasks: Vec::new(),
        }
    }

    /// Sum of `hours_required` over the tasks currently in the column.
    pub fn total_hours(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.hours_required)).sum()
    }
}
