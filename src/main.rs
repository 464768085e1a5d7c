use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use taskboard::task::IdSource;
use taskboard::{app::App, config::Config, logging, ui, FileStore, KanbanBoard, KeyValueStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    logging::init(&config.log_file, &config.log_level)?;
    tracing::info!(store = %config.store_dir.display(), "taskboard starting");

    // Open the board before touching the terminal so load errors print normally
    let board = KanbanBoard::open(FileStore::new(&config.store_dir))?;
    let mut app = App::new(board);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal loop failed");
    }
    result?;
    tracing::info!("taskboard exiting");
    Ok(())
}

fn run_app<B: Backend, S: KeyValueStore, I: IdSource>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, I>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}
