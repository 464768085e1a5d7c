use taskboard::storage::{self, CORRUPT_KEY, STATE_KEY};
use taskboard::task::SequentialIds;
use taskboard::{
    BoardEvent, BoardState, ColumnId, DragEnd, FileStore, KanbanBoard, KeyValueStore, TaskField,
    TaskRef,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> KanbanBoard<FileStore, SequentialIds> {
    KanbanBoard::open_with_ids(FileStore::new(dir.path()), SequentialIds::default()).unwrap()
}

fn add(board: &mut KanbanBoard<FileStore, SequentialIds>, title: &str, due: &str, hours: &str) {
    board.set_draft_field(TaskField::Title, title);
    board.set_draft_field(TaskField::DueDate, due);
    board.set_draft_field(TaskField::HoursRequired, hours);
    assert!(board.dispatch(BoardEvent::AddTask).unwrap());
}

#[test]
fn test_add_drag_and_reload() {
    let dir = TempDir::new().unwrap();
    let mut board = open(&dir);
    add(&mut board, "Write report", "2024-06-01", "3");

    let today = &board.state().column(ColumnId::DueToday).tasks;
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].title, "Write report");
    assert_eq!(today[0].due_date, "2024-06-01");
    assert_eq!(today[0].hours_required, 3);
    assert!(!today[0].completed);
    assert_eq!(board.state().total_hours(ColumnId::DueToday), 3);

    let task = today[0].clone();
    board
        .dispatch(BoardEvent::DragEnd(DragEnd::dropped(
            TaskRef::new(ColumnId::DueToday, 0),
            TaskRef::new(ColumnId::Later, 0),
        )))
        .unwrap();
    assert!(board.state().column(ColumnId::DueToday).tasks.is_empty());
    assert_eq!(board.state().column(ColumnId::Later).tasks, vec![task]);

    let reopened = open(&dir);
    assert_eq!(reopened.state(), board.state());
}

#[test]
fn test_completion_asymmetry() {
    let dir = TempDir::new().unwrap();
    let mut board = open(&dir);
    add(&mut board, "a", "", "1");
    add(&mut board, "b", "", "2");
    board
        .dispatch(BoardEvent::DragEnd(DragEnd::dropped(
            TaskRef::new(ColumnId::DueToday, 0),
            TaskRef::new(ColumnId::Later, 0),
        )))
        .unwrap();

    board
        .dispatch(BoardEvent::ToggleComplete(TaskRef::new(ColumnId::Later, 0)))
        .unwrap();
    assert!(board.state().column(ColumnId::Later).tasks.is_empty());
    let done = &board.state().column(ColumnId::Completed).tasks[0];
    assert_eq!(done.title, "a");
    assert!(done.completed);

    board
        .dispatch(BoardEvent::ToggleComplete(TaskRef::new(ColumnId::Completed, 0)))
        .unwrap();
    let today: Vec<&str> = board
        .state()
        .column(ColumnId::DueToday)
        .tasks
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(today, ["b", "a"]);
    assert!(board.state().column(ColumnId::Later).tasks.is_empty());
    assert!(board.state().column(ColumnId::Completed).tasks.is_empty());
    assert_eq!(board.state().total_hours(ColumnId::DueToday), 3);
}

#[test]
fn test_corrupt_file_is_backed_up_not_lost() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set(STATE_KEY, "{\"due-today\": ").unwrap();

    let mut board = open(&dir);
    assert_eq!(board.state(), &BoardState::default());
    assert!(board.recovery().is_some());

    add(&mut board, "fresh", "", "0");
    assert_eq!(
        store.get(CORRUPT_KEY).unwrap().as_deref(),
        Some("{\"due-today\": ")
    );
    assert!(dir.path().join("columns.json").exists());
    assert_eq!(
        storage::load(&store).unwrap().unwrap().task_count(),
        1
    );
}

#[test]
fn test_reads_layout_written_by_other_clients() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    let blob = r#"{
        "due-today": {"name": "Due Today", "tasks": [
            {"id": "5d1c", "title": "Ship it", "dueDate": "2024-06-01",
             "hoursRequired": 2, "isEditing": false, "completed": false}
        ]},
        "due-tomorrow": {"name": "Due Tomorrow", "tasks": []},
        "later": {"name": "Later", "tasks": []},
        "completed": {"name": "Completed", "tasks": []}
    }"#;
    store.set(STATE_KEY, blob).unwrap();

    let board = open(&dir);
    assert!(board.recovery().is_none());
    let task = board.state().task(TaskRef::new(ColumnId::DueToday, 0)).unwrap();
    assert_eq!(task.id.as_str(), "5d1c");
    assert_eq!(task.hours_required, 2);
}
