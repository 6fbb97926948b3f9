use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::KeyValueStore;
use crate::error::{AppError, AppResult};

/// JSON file-backed key-value store.
///
/// The whole map is kept in memory and the file is rewritten on every
/// mutation. Fine for the handful of small documents a single device keeps;
/// this is not a log and should not grow large.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    map: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, creating an empty file if missing.
    ///
    /// An unreadable or corrupt file is logged and treated as empty; the next
    /// write replaces it.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let map: BTreeMap<String, String> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Storage file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = BTreeMap::new();
                Self::persist(&path, &empty)?;
                empty
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = map.len(), "Storage file loaded");

        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the map to a sibling temp file, then renames it over `path`.
    fn persist(path: &Path, map: &BTreeMap<String, String>) -> AppResult<()> {
        let data = serde_json::to_vec_pretty(map)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, data)?;
        fs::rename(&tmp, path).map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })
    }

    /// Applies `f` to a copy of the map, persists it, then commits it in memory.
    fn mutate<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut map = self.map();
        let mut next = map.clone();
        f(&mut next);
        Self::persist(&self.path, &next)?;
        *map = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.mutate(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        if !self.map().contains_key(key) {
            return Ok(());
        }
        self.mutate(|m| {
            m.remove(key);
        })
    }

    fn keys(&self) -> Vec<String> {
        self.map().keys().cloned().collect()
    }
}
