//! Durable storage of the editor state between sessions.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::errors::PersistError;
use crate::store::PersistedState;

/// Storage namespace; the file adapter uses it as its file stem.
pub const STORAGE_KEY: &str = "tritan-workflow-storage";

/// Load/save of the `{workflow, nodes, edges}` triple.
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<PersistedState>, PersistError>;

    fn save(&self, state: &PersistedState) -> Result<(), PersistError>;
}

/// JSON file under a state directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/tritan-workflow-storage.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let state: PersistedState = serde_json::from_str(&raw)?;
        debug!(
            event = "persistence.loaded",
            domain = "persistence",
            path = %self.path.display(),
            node_count = state.nodes.len() as u64
        );
        Ok(Some(state))
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_vec_pretty(state)?;
        // Target is only ever replaced by rename.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// In-process store for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    state: Mutex<Option<PersistedState>>,
    saves: Mutex<u64>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Option<PersistedState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of saves since construction.
    pub fn save_count(&self) -> u64 {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        Ok(self.current())
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
