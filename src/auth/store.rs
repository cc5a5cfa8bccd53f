//! Durable key/value storage for the session.
//!
//! DESIGN
//! ======
//! The trait mirrors browser local storage (string keys, string values) with
//! batch writes, so the access token and user info always land or vanish
//! together. `FileStore` is the on-disk analogue that survives restarts.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Storage key for the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "bloggy_access_token";
/// Storage key for the JSON-serialized user info.
pub const USER_INFO_KEY: &str = "bloggy_user_info";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("session store I/O failed: {0}")]
    Io(String),

    #[error("session store serialize failed: {0}")]
    Serialize(String),
}

/// Persisted string storage used by the session manager.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Write every entry in one step.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium rejects the write; no
    /// entry is applied in that case.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Remove every key in one step. Removed keys must not reappear after a
    /// restart, even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the keys may still be readable from the
    /// backing medium.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError>;

    /// Re-read entries another process may have written. Returns true iff
    /// anything changed. Stores with no outside writers never change.
    fn reload(&self) -> bool {
        false
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set_all(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in pairs {
            entries.insert((*key).to_owned(), (*value).to_owned());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON object on disk, rewritten through a temp file + rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is logged and treated
    /// as empty; it is overwritten on the next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries: Mutex::new(entries) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, text).map_err(|e| StoreError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e.to_string()))
    }

    /// Delete the session file after a failed rewrite so removed keys cannot
    /// come back on the next `open`. Succeeds only once nothing is on disk.
    fn discard_file(&self, cause: &StoreError) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::warn!(path = %self.path.display(), error = %cause, "session rewrite failed; file deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "session file could not be deleted");
                Err(cause.clone())
            }
        }
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "session file unreadable; starting empty");
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "session file corrupt; starting empty");
            BTreeMap::new()
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set_all(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        for (key, value) in pairs {
            next.insert((*key).to_owned(), (*value).to_owned());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        for key in keys {
            next.remove(*key);
        }
        // Memory is cleared even when the disk write fails.
        let result = self.persist(&next);
        *entries = next;
        result.or_else(|e| self.discard_file(&e))
    }

    fn reload(&self) -> bool {
        let fresh = load_entries(&self.path);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if *entries == fresh {
            return false;
        }
        *entries = fresh;
        true
    }
}
