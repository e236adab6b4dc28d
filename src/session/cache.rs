use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use thiserror::Error;

use super::snapshot::SessionSnapshot;

/// Fixed name of the cached session entry
pub const SESSION_CACHE_KEY: &str = "auth_user";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Session cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session cache entry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Client-local persistence for the session snapshot
pub trait SessionCache: Send + Sync {
    fn load(&self) -> Result<Option<SessionSnapshot>, CacheError>;
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), CacheError>;
    fn remove(&self) -> Result<(), CacheError>;
}

/// Stores the snapshot as `<dir>/auth_user.json`. Saves go through a temp
/// file in the same directory that is renamed over the entry, so readers see
/// either the old or the new snapshot.
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", SESSION_CACHE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionCache for FileSessionCache {
    fn load(&self) -> Result<Option<SessionSnapshot>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), CacheError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(snapshot)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Holds the serialized entry in memory, the way a browser's local storage would
#[derive(Default)]
pub struct MemorySessionCache {
    entry: Mutex<Option<String>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<String> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn put_raw(&self, value: impl Into<String>) {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.into());
    }
}

impl SessionCache for MemorySessionCache {
    fn load(&self) -> Result<Option<SessionSnapshot>, CacheError> {
        match self.raw() {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), CacheError> {
        self.put_raw(serde_json::to_string(snapshot)?);
        Ok(())
    }

    fn remove(&self) -> Result<(), CacheError> {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserProfile;
    use uuid::Uuid;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot::new(
            UserProfile {
                id: Uuid::new_v4(),
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                ..Default::default()
            },
            None,
        )
    }

    #[test]
    fn file_cache_uses_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSessionCache::new(dir.path());
        assert_eq!(cache.path(), dir.path().join("auth_user.json"));
        assert!(cache.load().unwrap().is_none());

        let snapshot = snapshot();
        cache.save(&snapshot).unwrap();
        assert_eq!(cache.load().unwrap(), Some(snapshot));

        cache.remove().unwrap();
        assert!(!cache.path().exists());
        // Removing twice is fine
        cache.remove().unwrap();
    }

    #[test]
    fn file_cache_replaces_entry_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSessionCache::new(dir.path().join("nested"));

        cache.save(&snapshot()).unwrap();
        let second = snapshot();
        cache.save(&second).unwrap();
        assert_eq!(cache.load().unwrap(), Some(second));

        let entries: Vec<_> = fs::read_dir(dir.path().join("nested")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn corrupt_entries_are_reported() {
        let cache = MemorySessionCache::new();
        cache.put_raw("{not json");
        assert!(matches!(cache.load(), Err(CacheError::Corrupt(_))));
    }
}
