//! Keyboard interaction over a [`KanbanBoard`].
//!
//! Dragging is a mode: `Space` lifts the task under the cursor, the arrow
//! keys move the drop target, `Enter` drops and `Esc` cancels. Either way a
//! single [`DragEnd`] reaches the board.

use crate::column::ColumnId;
use crate::kanban_board::{BoardEvent, KanbanBoard};
use crate::reorder::{DragEnd, TaskRef};
use crate::storage::KeyValueStore;
use crate::task::{IdSource, TaskField, UuidIds};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Dragging { source: TaskRef, target: TaskRef },
    Editing { at: TaskRef, field: TaskField },
    Creating { field: TaskField },
}

pub struct App<S, I = UuidIds> {
    pub board: KanbanBoard<S, I>,
    pub cursor: TaskRef,
    pub mode: Mode,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl<S: KeyValueStore, I: IdSource> App<S, I> {
    pub fn new(board: KanbanBoard<S, I>) -> Self {
        let status = board.recovery().map(|r| match &r.backup_key {
            Some(key) => format!(
                "Stored board was unreadable ({}); started fresh, old data kept under '{key}'",
                r.reason
            ),
            None => format!("Stored board was unreadable ({}); started fresh", r.reason),
        });
        Self {
            board,
            cursor: TaskRef::new(ColumnId::DueToday, 0),
            mode: Mode::Browse,
            status,
            should_quit: false,
        }
    }

    fn column_len(&self, column: ColumnId) -> usize {
        self.board.state().column(column).tasks.len()
    }

    fn clamp_cursor(&mut self) {
        let len = self.column_len(self.cursor.column);
        self.cursor.index = self.cursor.index.min(len.saturating_sub(1));
    }

    fn has_task_at_cursor(&self) -> bool {
        self.board.state().task(self.cursor).is_some()
    }

    fn dispatch(&mut self, event: BoardEvent) {
        match self.board.dispatch(event) {
            Ok(true) => self.status = None,
            Ok(false) => {}
            Err(err) => self.status = Some(format!("Save failed: {err}")),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode {
            Mode::Browse => self.browse_key(key.code),
            Mode::Dragging { source, target } => self.drag_key(key.code, source, target),
            Mode::Editing { at, field } => self.edit_key(key.code, at, field),
            Mode::Creating { field } => self.create_key(key.code, field),
        }
    }

    fn browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left => {
                self.cursor.column = self.cursor.column.left();
                self.clamp_cursor();
            }
            KeyCode::Right => {
                self.cursor.column = self.cursor.column.right();
                self.clamp_cursor();
            }
            KeyCode::Up => self.cursor.index = self.cursor.index.saturating_sub(1),
            KeyCode::Down => {
                self.cursor.index += 1;
                self.clamp_cursor();
            }
            KeyCode::Char(' ') if self.has_task_at_cursor() => {
                self.mode = Mode::Dragging {
                    source: self.cursor,
                    target: self.cursor,
                };
            }
            KeyCode::Char('x') if self.has_task_at_cursor() => {
                self.dispatch(BoardEvent::ToggleComplete(self.cursor));
                self.clamp_cursor();
            }
            KeyCode::Char('e') | KeyCode::Enter if self.has_task_at_cursor() => {
                self.dispatch(BoardEvent::BeginEdit(self.cursor));
                self.mode = Mode::Editing {
                    at: self.cursor,
                    field: TaskField::Title,
                };
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Creating {
                    field: TaskField::Title,
                };
            }
            _ => {}
        }
    }

    /// Highest valid drop index in `column` while `source` is lifted.
    fn max_drop_index(&self, source: TaskRef, column: ColumnId) -> usize {
        let len = self.column_len(column);
        if column == source.column {
            len.saturating_sub(1)
        } else {
            len
        }
    }

    fn drag_key(&mut self, code: KeyCode, source: TaskRef, mut target: TaskRef) {
        match code {
            KeyCode::Left | KeyCode::Right => {
                target.column = if code == KeyCode::Left {
                    target.column.left()
                } else {
                    target.column.right()
                };
                target.index = target.index.min(self.max_drop_index(source, target.column));
            }
            KeyCode::Up => target.index = target.index.saturating_sub(1),
            KeyCode::Down => {
                target.index = (target.index + 1).min(self.max_drop_index(source, target.column));
            }
            KeyCode::Enter => {
                self.dispatch(BoardEvent::DragEnd(DragEnd::dropped(source, target)));
                self.cursor = target;
                self.mode = Mode::Browse;
                return;
            }
            KeyCode::Esc => {
                self.dispatch(BoardEvent::DragEnd(DragEnd::cancelled(source)));
                self.mode = Mode::Browse;
                return;
            }
            _ => return,
        }
        self.mode = Mode::Dragging { source, target };
    }

    fn edit_key(&mut self, code: KeyCode, at: TaskRef, field: TaskField) {
        let Some(task) = self.board.state().task(at) else {
            self.mode = Mode::Browse;
            return;
        };
        let mut value = task.field(field);
        match code {
            KeyCode::Tab => {
                self.mode = Mode::Editing {
                    at,
                    field: field.next(),
                };
                return;
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.dispatch(BoardEvent::FinishEdit(at));
                self.mode = Mode::Browse;
                return;
            }
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char(c) => push_char(&mut value, field, c),
            _ => return,
        }
        self.dispatch(BoardEvent::UpdateField { at, field, value });
    }

    fn create_key(&mut self, code: KeyCode, field: TaskField) {
        let mut value = self.board.draft().field(field);
        match code {
            KeyCode::Tab => {
                self.mode = Mode::Creating {
                    field: field.next(),
                };
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => {
                self.dispatch(BoardEvent::AddTask);
                self.mode = Mode::Creating {
                    field: TaskField::Title,
                };
            }
            KeyCode::Backspace => {
                value.pop();
                self.board.set_draft_field(field, &value);
            }
            KeyCode::Char(c) => {
                push_char(&mut value, field, c);
                self.board.set_draft_field(field, &value);
            }
            _ => {}
        }
    }
}

/// Appends a typed character. A zero hours value is replaced rather than
/// extended, so typing `5` into `0` gives `5`.
fn push_char(value: &mut String, field: TaskField, c: char) {
    if field == TaskField::HoursRequired && value == "0" {
        value.clear();
    }
    value.push(c);
}
