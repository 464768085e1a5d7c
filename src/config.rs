use clap::Parser;
use std::path::PathBuf;

/// Kanban board for the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "taskboard", version, about)]
pub struct Config {
    /// Directory holding the board file (`columns.json`).
    #[arg(long, default_value = ".")]
    pub store_dir: PathBuf,

    /// File receiving log output; the terminal is taken by the board.
    #[arg(long, default_value = "taskboard.log")]
    pub log_file: PathBuf,

    /// Log filter, e.g. `info` or `taskboard=debug`.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("."),
            log_file: PathBuf::from("taskboard.log"),
            log_level: "info".to_string(),
        }
    }
}
