//! Session storage backends

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{ClientError, ClientResult};

/// Key holding the opaque bearer token
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key holding the serialized user profile
pub const USER_KEY: &str = "user";

/// Persistent key-value store for the session.
///
/// `set_many` and `remove_many` apply all keys or none.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set_many(&self, entries: &[(&str, String)]) -> ClientResult<()>;
    fn remove_many(&self, keys: &[&str]) -> ClientResult<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local storage; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> ClientResult<()> {
        let mut map = lock(&self.entries);
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> ClientResult<()> {
        let mut map = lock(&self.entries);
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// One JSON object on disk, replaced atomically on every write
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage backed by `path`; parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ClientResult<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Session file is corrupt, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> ClientResult<()> {
        let storage_err =
            |e: std::io::Error| ClientError::Storage(format!("Failed to write {}: {}", self.path.display(), e));

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(storage_err)?;

        let content = serde_json::to_vec_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        {
            let mut file = std::fs::File::create(&tmp).map_err(storage_err)?;
            file.write_all(&content).map_err(storage_err)?;
            file.sync_all().map_err(storage_err)?;
        }
        std::fs::rename(&tmp, &self.path).map_err(storage_err)?;
        tracing::debug!(path = %self.path.display(), "Session file saved");
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_many(&self, entries: &[(&str, String)]) -> ClientResult<()> {
        let _guard = lock(&self.write_lock);
        let mut map = self.load()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        self.save(&map)
    }

    fn remove_many(&self, keys: &[&str]) -> ClientResult<()> {
        let _guard = lock(&self.write_lock);
        let mut map = self.load()?;
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before && !self.path.exists() {
            return Ok(());
        }
        self.save(&map)
    }
}
