//! Key-value persistence for the board.
//!
//! The whole board lives under one key as a JSON blob and is rewritten on
//! every change.

use crate::board_state::BoardState;
use crate::error::StorageError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key holding the serialized board.
pub const STATE_KEY: &str = "columns";

/// Key receiving an unreadable blob before it is replaced.
pub const CORRUPT_KEY: &str = "columns.corrupt";

type StoreResult<T> = std::result::Result<T, StorageError>;

/// A string key-value store in the manner of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&path, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))
    }
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the board from `store`.
///
/// `Ok(None)` means nothing was stored yet. A blob that does not parse as a
/// complete board is an error; there is no partial recovery.
pub fn load(store: &impl KeyValueStore) -> StoreResult<Option<BoardState>> {
    let Some(data) = store.get(STATE_KEY)? else {
        info!("no stored board found");
        return Ok(None);
    };
    let state = parse(&data)?;
    debug!(tasks = state.task_count(), "loaded board");
    Ok(Some(state))
}

pub fn parse(data: &str) -> StoreResult<BoardState> {
    serde_json::from_str(data).map_err(|e| StorageError::malformed(e.to_string()))
}

/// Writes the full board under the state key, replacing what was there.
pub fn save(store: &mut impl KeyValueStore, state: &BoardState) -> StoreResult<()> {
    let data = serde_json::to_string_pretty(state).map_err(StorageError::Serialize)?;
    store.set(STATE_KEY, &data)?;
    debug!(tasks = state.task_count(), "saved board");
    Ok(())
}
