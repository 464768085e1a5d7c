//! Kanban task board: four fixed due-date columns, drag reordering,
//! inline editing and completion, persisted as one JSON blob.

pub mod app;
pub mod board_state;
pub mod column;
pub mod config;
pub mod error;
pub mod kanban_board;
pub mod logging;
pub mod reorder;
pub mod storage;
pub mod task;
pub mod ui;

pub use board_state::BoardState;
pub use column::{Column, ColumnId};
pub use error::{BoardError, Result, StorageError};
pub use kanban_board::{BoardEvent, KanbanBoard, Recovery};
pub use reorder::{DragEnd, TaskRef};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use task::{IdSource, Task, TaskDraft, TaskField, TaskId, UuidIds};
