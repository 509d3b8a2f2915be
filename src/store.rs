use crate::error::StoreError;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    str::FromStr,
};
use tracing::{debug, info, warn};

/// Key/value durable storage. Each key is independently consistent; there is
/// no multi-key atomicity.
pub trait PersistentStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once keys plus values exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-object file store, written through on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing, unreadable or malformed file
    /// opens as an empty store.
    pub fn open(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => {
                    info!("Loaded {} persisted keys from {:?}", entries.len(), path);
                    entries
                }
                Err(e) => {
                    warn!("Ignoring malformed store file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store file at {:?}, starting empty", path);
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Store file {:?} unavailable, using defaults: {}", path, e);
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            entries: RefCell::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_through(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&*self.entries.borrow())?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl PersistentStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        if let Err(e) = self.write_through() {
            // Keep memory and disk agreeing on what was persisted.
            let mut entries = self.entries.borrow_mut();
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// Shared handle over a [`PersistentStore`] with typed accessors.
///
/// Failures never propagate out of the plain accessors: a failed read is
/// treated as absent and a failed write is dropped, both with a warning.
#[derive(Clone)]
pub struct Store {
    backend: Rc<dyn PersistentStore>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    pub fn new(backend: impl PersistentStore + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Read of '{}' failed, treating as absent: {}", key, e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value) {
            warn!("Dropped write of '{}': {}", key, e);
        }
    }

    pub fn read_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| StoreError::Malformed {
                key: key.to_string(),
                value: raw,
            })
    }

    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.read_parsed(key).unwrap_or_else(|e| {
            warn!("{}; using default", e);
            None
        })
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_parsed(key)
    }

    pub fn set_display<T: Display>(&self, key: &str, value: &T) {
        self.set(key, &value.to_string());
    }

    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|_| StoreError::Malformed {
                key: key.to_string(),
                value: raw,
            })
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.read_json(key).unwrap_or_else(|e| {
            warn!("{}; using default", e);
            None
        })
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(payload) => self.set(key, &payload),
            Err(e) => warn!("Dropped write of '{}': {}", key, e),
        }
    }
}
