use crate::board_state::BoardState;
use crate::error::{BoardError, Result, StorageError};
use crate::reorder::{DragEnd, TaskRef};
use crate::storage::{self, KeyValueStore, CORRUPT_KEY, STATE_KEY};
use crate::task::{IdSource, TaskDraft, TaskField, UuidIds};
use tracing::{debug, error, info, warn};

/// One user action against the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Create a task from the current draft.
    AddTask,
    BeginEdit(TaskRef),
    UpdateField {
        at: TaskRef,
        field: TaskField,
        value: String,
    },
    FinishEdit(TaskRef),
    ToggleComplete(TaskRef),
    DragEnd(DragEnd),
}

/// Set when the stored board could not be read and a fresh one was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub reason: String,
    /// Key the unreadable blob was copied to, if the copy succeeded.
    pub backup_key: Option<String>,
}

/// Owns the current board snapshot and the creation draft, and writes the
/// board to its store whenever a snapshot replaces it.
#[derive(Debug)]
pub struct KanbanBoard<S, I = UuidIds> {
    store: S,
    ids: I,
    state: BoardState,
    draft: TaskDraft,
    recovery: Option<Recovery>,
}

impl<S: KeyValueStore> KanbanBoard<S> {
    pub fn open(store: S) -> Result<Self> {
        Self::open_with_ids(store, UuidIds)
    }
}

impl<S: KeyValueStore, I: IdSource> KanbanBoard<S, I> {
    /// Loads the stored board, or starts from four empty columns.
    ///
    /// An unreadable blob is copied aside under [`CORRUPT_KEY`] before the
    /// board starts fresh, so the next save does not destroy it. Earlier
    /// backups are never overwritten; later ones get a numeric suffix.
    pub fn open_with_ids(mut store: S, ids: I) -> Result<Self> {
        let (state, recovery) = match storage::load(&store) {
            Ok(Some(state)) => {
                info!(tasks = state.task_count(), "restored board");
                (state, None)
            }
            Ok(None) => {
                info!("starting with an empty board");
                (BoardState::default(), None)
            }
            Err(StorageError::Malformed { reason }) => {
                warn!(%reason, "stored board is unreadable, starting fresh");
                let backup_key = match back_up_corrupt(&mut store) {
                    Ok(key) => key,
                    Err(err) => {
                        error!(error = %err, "failed to back up unreadable board");
                        None
                    }
                };
                (BoardState::default(), Some(Recovery { reason, backup_key }))
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            store,
            ids,
            state,
            draft: TaskDraft::default(),
            recovery,
        })
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn recovery(&self) -> Option<&Recovery> {
        self.recovery.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_draft_field(&mut self, field: TaskField, raw: &str) {
        self.draft = self.draft.with_field(field, raw);
    }

    /// Applies `event` and persists the result.
    ///
    /// Returns whether the board changed. Events addressing a missing task
    /// leave the board as it was. Only a failed save is an error, and the
    /// new snapshot is kept in memory even then.
    pub fn dispatch(&mut self, event: BoardEvent) -> Result<bool> {
        let next = match self.apply(&event) {
            Ok(next) => next,
            Err(BoardError::TaskNotFound { column, index }) => {
                debug!(?event, %column, index, "ignoring event for missing task");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };
        self.replace(next)
    }

    fn apply(&mut self, event: &BoardEvent) -> Result<BoardState> {
        match event {
            BoardEvent::AddTask => {
                let (next, draft) = self.state.add_task(&self.draft, &mut self.ids);
                if next != self.state {
                    self.draft = draft;
                }
                Ok(next)
            }
            BoardEvent::BeginEdit(at) => self.state.begin_edit(*at),
            BoardEvent::UpdateField { at, field, value } => {
                self.state.update_field(*at, *field, value)
            }
            BoardEvent::FinishEdit(at) => self.state.finish_edit(*at),
            BoardEvent::ToggleComplete(at) => self.state.toggle_complete(*at),
            BoardEvent::DragEnd(drag) => self.state.apply_drag(drag),
        }
    }

    /// Swaps in `next` and saves it if it differs from the current board.
    pub fn replace(&mut self, next: BoardState) -> Result<bool> {
        if next == self.state {
            return Ok(false);
        }
        self.state = next;
        if let Err(err) = storage::save(&mut self.store, &self.state) {
            error!(error = %err, "failed to save board");
            return Err(err.into());
        }
        Ok(true)
    }
}

/// Copies the stored blob to the first unused backup key and returns it.
fn back_up_corrupt(
    store: &mut impl KeyValueStore,
) -> std::result::Result<Option<String>, StorageError> {
    let Some(raw) = store.get(STATE_KEY)? else {
        return Ok(None);
    };
    let mut key = CORRUPT_KEY.to_string();
    let mut n = 0;
    while store.get(&key)?.is_some() {
        n += 1;
        key = format!("{CORRUPT_KEY}.{n}");
    }
    store.set(&key, &raw)?;
    info!(%key, "backed up unreadable board");
    Ok(Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnId;
    use crate::storage::MemoryStore;
    use crate::task::SequentialIds;
    use std::path::PathBuf;

    fn open(store: MemoryStore) -> KanbanBoard<MemoryStore, SequentialIds> {
        KanbanBoard::open_with_ids(store, SequentialIds::default()).unwrap()
    }

    fn add(board: &mut KanbanBoard<MemoryStore, SequentialIds>, title: &str, hours: &str) {
        board.set_draft_field(TaskField::Title, title);
        board.set_draft_field(TaskField::HoursRequired, hours);
        assert!(board.dispatch(BoardEvent::AddTask).unwrap());
    }

    #[test]
    fn test_open_empty_store_starts_with_default_board() {
        let board = open(MemoryStore::new());
        assert_eq!(board.state(), &BoardState::default());
        assert!(board.recovery().is_none());
        assert!(board.store().get(STATE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_every_change_is_saved() {
        let mut board = open(MemoryStore::new());
        add(&mut board, "a", "2");
        assert_eq!(
            storage::load(board.store()).unwrap().as_ref(),
            Some(board.state())
        );

        board
            .dispatch(BoardEvent::ToggleComplete(TaskRef::new(ColumnId::DueToday, 0)))
            .unwrap();
        assert_eq!(
            storage::load(board.store()).unwrap().as_ref(),
            Some(board.state())
        );
    }

    #[test]
    fn test_add_resets_draft_only_on_success() {
        let mut board = open(MemoryStore::new());
        board.set_draft_field(TaskField::DueDate, "2024-06-01");
        assert!(!board.dispatch(BoardEvent::AddTask).unwrap());
        assert_eq!(board.draft().due_date, "2024-06-01");

        board.set_draft_field(TaskField::Title, "a");
        assert!(board.dispatch(BoardEvent::AddTask).unwrap());
        assert_eq!(board.draft(), &TaskDraft::default());
    }

    #[test]
    fn test_draft_hours_are_coerced() {
        let mut board = open(MemoryStore::new());
        board.set_draft_field(TaskField::HoursRequired, "soon");
        assert_eq!(board.draft().hours_required, 0);
        board.set_draft_field(TaskField::HoursRequired, "6");
        assert_eq!(board.draft().hours_required, 6);
    }

    #[test]
    fn test_unchanged_board_is_not_saved() {
        let mut board = open(MemoryStore::new());
        let cancelled = DragEnd::cancelled(TaskRef::new(ColumnId::DueToday, 0));
        assert!(!board.dispatch(BoardEvent::DragEnd(cancelled)).unwrap());
        assert!(board.store().get(STATE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_event_for_missing_task_is_ignored() {
        let mut board = open(MemoryStore::new());
        add(&mut board, "a", "1");
        let before = board.state().clone();

        let changed = board
            .dispatch(BoardEvent::BeginEdit(TaskRef::new(ColumnId::Later, 3)))
            .unwrap();
        assert!(!changed);
        assert_eq!(board.state(), &before);
    }

    #[test]
    fn test_edit_cycle() {
        let mut board = open(MemoryStore::new());
        add(&mut board, "a", "1");
        let at = TaskRef::new(ColumnId::DueToday, 0);

        board.dispatch(BoardEvent::BeginEdit(at)).unwrap();
        board
            .dispatch(BoardEvent::UpdateField {
                at,
                field: TaskField::HoursRequired,
                value: "5".into(),
            })
            .unwrap();
        board.dispatch(BoardEvent::FinishEdit(at)).unwrap();

        let task = board.state().task(at).unwrap();
        assert_eq!(task.hours_required, 5);
        assert!(!task.is_editing);
        assert_eq!(board.state().total_hours(ColumnId::DueToday), 5);
    }

    #[test]
    fn test_malformed_store_recovers_and_keeps_backup() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, "[1, 2, 3]").unwrap();

        let mut board = open(store);
        assert_eq!(board.state(), &BoardState::default());
        let recovery = board.recovery().unwrap();
        assert_eq!(recovery.backup_key.as_deref(), Some(CORRUPT_KEY));

        add(&mut board, "a", "1");
        assert_eq!(
            board.store().get(CORRUPT_KEY).unwrap().as_deref(),
            Some("[1, 2, 3]")
        );
    }

    #[test]
    fn test_second_recovery_keeps_first_backup() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, "first garbage").unwrap();
        let mut board = open(store);
        add(&mut board, "a", "1");

        let mut store = board.store().clone();
        store.set(STATE_KEY, "second garbage").unwrap();
        let board = open(store);

        assert_eq!(
            board.recovery().unwrap().backup_key.as_deref(),
            Some("columns.corrupt.1")
        );
        assert_eq!(
            board.store().get(CORRUPT_KEY).unwrap().as_deref(),
            Some("first garbage")
        );
        assert_eq!(
            board.store().get("columns.corrupt.1").unwrap().as_deref(),
            Some("second garbage")
        );
    }

    /// Reads fine, refuses every write.
    #[derive(Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io {
                path: PathBuf::from("read-only"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[test]
    fn test_failed_save_keeps_new_state_in_memory() {
        let mut board =
            KanbanBoard::open_with_ids(ReadOnlyStore::default(), SequentialIds::default()).unwrap();
        board.set_draft_field(TaskField::Title, "a");

        let err = board.dispatch(BoardEvent::AddTask).unwrap_err();
        assert!(matches!(err, BoardError::Storage(StorageError::Io { .. })));
        assert_eq!(board.state().column(ColumnId::DueToday).tasks.len(), 1);
    }
}
