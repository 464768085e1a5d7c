use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Board-wide unique task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub due_date: String, // calendar date as entered, usually YYYY-MM-DD
    pub hours_required: u32,
    pub is_editing: bool,
    pub completed: bool,
}

impl Task {
    /// Returns a copy with `field` replaced by `raw`, coercing hours.
    pub fn with_field(&self, field: TaskField, raw: &str) -> Self {
        let mut task = self.clone();
        match field {
            TaskField::Title => task.title = raw.to_string(),
            TaskField::DueDate => task.due_date = raw.to_string(),
            TaskField::HoursRequired => task.hours_required = parse_hours(raw),
        }
        task
    }

    pub fn field(&self, field: TaskField) -> String {
        match field {
            TaskField::Title => self.title.clone(),
            TaskField::DueDate => self.due_date.clone(),
            TaskField::HoursRequired => self.hours_required.to_string(),
        }
    }
}

/// Editable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    DueDate,
    HoursRequired,
}

impl TaskField {
    pub const ALL: [TaskField; 3] = [
        TaskField::Title,
        TaskField::DueDate,
        TaskField::HoursRequired,
    ];

    /// Next field in form order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            TaskField::Title => TaskField::DueDate,
            TaskField::DueDate => TaskField::HoursRequired,
            TaskField::HoursRequired => TaskField::Title,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::DueDate => "Due",
            TaskField::HoursRequired => "Hours",
        }
    }
}

/// The creation form's in-progress task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: String,
    pub hours_required: u32,
}

impl TaskDraft {
    pub fn with_field(&self, field: TaskField, raw: &str) -> Self {
        let mut draft = self.clone();
        match field {
            TaskField::Title => draft.title = raw.to_string(),
            TaskField::DueDate => draft.due_date = raw.to_string(),
            TaskField::HoursRequired => draft.hours_required = parse_hours(raw),
        }
        draft
    }

    pub fn field(&self, field: TaskField) -> String {
        match field {
            TaskField::Title => self.title.clone(),
            TaskField::DueDate => self.due_date.clone(),
            TaskField::HoursRequired => self.hours_required.to_string(),
        }
    }

    /// Builds a fresh, incomplete, non-editing task from this draft.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            due_date: self.due_date,
            hours_required: self.hours_required,
            is_editing: false,
            completed: false,
        }
    }
}

/// Source of fresh task identifiers.
pub trait IdSource {
    fn next_id(&mut self) -> TaskId;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> TaskId {
        TaskId(Uuid::new_v4().to_string())
    }
}

/// Deterministic `task-1`, `task-2`, ... identifiers.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> TaskId {
        self.next += 1;
        TaskId(format!("task-{}", self.next))
    }
}

/// Reads the leading integer of `raw`, falling back to zero.
///
/// Leading whitespace and an optional sign are accepted, then the run of
/// ASCII digits up to the first other character. Input without digits and
/// negative values become 0; values past `u32::MAX` saturate.
pub fn parse_hours(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || negative {
        return 0;
    }
    rest[..digits].parse().unwrap_or(u32::MAX)
}
