use crate::app::{App, Mode};
use crate::column::ColumnId;
use crate::storage::KeyValueStore;
use crate::task::{IdSource, Task, TaskField};
use chrono::{Local, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn draw<S: KeyValueStore, I: IdSource>(f: &mut Frame, app: &App<S, I>) {
    draw_on(f, app, Local::now().date_naive());
}

/// Renders the board as of `today`, which decides what counts as overdue.
pub fn draw_on<S: KeyValueStore, I: IdSource>(f: &mut Frame, app: &App<S, I>, today: NaiveDate) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(25); ColumnId::ALL.len()])
        .split(rows[0]);

    for (i, column) in ColumnId::ALL.into_iter().enumerate() {
        draw_column(f, app, column, today, chunks[i]);
    }
    draw_form(f, app, rows[1]);
    draw_status(f, app, rows[2]);
}

/// True when `due` is a `YYYY-MM-DD` date before `today`.
pub fn is_overdue(due: &str, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(due, "%Y-%m-%d").is_ok_and(|date| date < today)
}

fn task_item<'a>(task: &'a Task, editing: Option<TaskField>, today: NaiveDate) -> ListItem<'a> {
    let mut title_style = Style::default().fg(Color::White);
    if task.completed {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
    }
    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let mut lines = vec![Line::from(vec![
        Span::raw(checkbox),
        Span::styled(task.title.as_str(), title_style),
    ])];

    match editing {
        Some(active) => {
            for field in TaskField::ALL {
                let style = if field == active {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("    {}: ", field.label())),
                    Span::styled(task.field(field), style),
                ]));
            }
        }
        None => {
            let due_style = if !task.completed && is_overdue(&task.due_date, today) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw("    Due: "),
                Span::styled(task.due_date.as_str(), due_style),
            ]));
            lines.push(Line::from(format!("    Hours: {}", task.hours_required)));
        }
    }
    ListItem::new(lines)
}

fn draw_column<S: KeyValueStore, I: IdSource>(
    f: &mut Frame,
    app: &App<S, I>,
    column: ColumnId,
    today: NaiveDate,
    area: Rect,
) {
    let col = app.board.state().column(column);
    let mut items: Vec<ListItem> = col
        .tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let editing = match app.mode {
                Mode::Editing { at, field } if at.column == column && at.index == index => {
                    Some(field)
                }
                _ if task.is_editing => Some(TaskField::Title),
                _ => None,
            };
            task_item(task, editing, today)
        })
        .collect();

    let mut selected = (app.cursor.column == column && !col.tasks.is_empty())
        .then_some(app.cursor.index);

    if let Mode::Dragging { source, target } = app.mode {
        if source.column == column {
            items[source.index] = items[source.index]
                .clone()
                .style(Style::default().add_modifier(Modifier::DIM));
        }
        if target.column == column {
            // Indices after the lifted task shift down by one in its own column.
            let slot = if source.column == column && target.index >= source.index {
                target.index + 1
            } else {
                target.index
            };
            let marker = ListItem::new(Line::from(Span::styled(
                "  ▼ drop here",
                Style::default().fg(Color::Yellow),
            )));
            items.insert(slot.min(items.len()), marker);
            selected = Some(slot.min(items.len() - 1));
        } else {
            selected = None;
        }
    }

    let focused = app.cursor.column == column
        || matches!(app.mode, Mode::Dragging { target, .. } if target.column == column);
    let block = Block::default()
        .title(col.name.as_str())
        .title_bottom(Line::from(format!("Total Hours: {}", col.total_hours())).right_aligned())
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_form<S: KeyValueStore, I: IdSource>(f: &mut Frame, app: &App<S, I>, area: Rect) {
    let active = match app.mode {
        Mode::Creating { field } => Some(field),
        _ => None,
    };
    let draft = app.board.draft();

    let mut spans = Vec::new();
    for field in TaskField::ALL {
        let style = if active == Some(field) {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        spans.push(Span::raw(format!("{}: ", field.label())));
        spans.push(Span::styled(format!("[{}]", draft.field(field)), style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        if active.is_some() {
            "Enter: add task  Tab: next  Esc: close"
        } else {
            "a: new task"
        },
        Style::default().fg(Color::DarkGray),
    ));

    let form = Paragraph::new(Line::from(spans))
        .block(Block::default().title("New Task").borders(Borders::ALL));
    f.render_widget(form, area);
}

fn draw_status<S: KeyValueStore, I: IdSource>(f: &mut Frame, app: &App<S, I>, area: Rect) {
    let line = match &app.status {
        Some(message) => Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(
            "←→↑↓ move  Space drag  x complete  e edit  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
