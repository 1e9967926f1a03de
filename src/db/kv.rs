//! Local key-value storage: one string document per key.
//!
//! No transactions, no listing, no delete. A write replaces the whole
//! value for a key; whichever write lands last wins.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use super::StoreError;

/// Minimal document store the repository and the reminder engine sit on.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, `None` when it has never been written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value for `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ═══════════════════════════════════════════
// FileStore — one JSON file per key
// ═══════════════════════════════════════════

/// Directory-backed store: `<dir>/<key>.json`.
///
/// Writes go to a temp file in the same directory which is then renamed
/// over the target, so a reader never sees a half-written document.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.item_path(key)).map_err(|e| e.error)?;
        tracing::debug!(key, bytes = value.len(), "Document written");
        Ok(())
    }
}

// ═══════════════════════════════════════════
// MemoryStore — process-local, for hosts and tests
// ═══════════════════════════════════════════

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.items
            .lock()
            .map(|items| items.get(key).cloned())
            .map_err(|_| StoreError::LockPoisoned)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::LockPoisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
