//! Persistent storage for the locally entered API key.

use crate::error::{ProEditError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Logical name the API key is stored under.
pub const API_KEY_STORAGE_KEY: &str = "gemini_api_key_local";

/// A key-value scope holding at most one API key.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored key, if any.
    fn get(&self) -> Result<Option<String>>;

    /// Stores a key. Blank keys are ignored; keys are trimmed.
    fn set(&self, key: &str) -> Result<()>;

    /// Removes the stored key.
    fn clear(&self) -> Result<()>;
}

/// Stores the key in a JSON file, surviving restarts.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Uses the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `<config dir>/proedit/credentials.json`.
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ProEditError::EnvironmentUnsupported("no user config directory available".into())
        })?;
        Ok(Self::new(dir.join("proedit").join("credentials.json")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self
            .read_entries()?
            .remove(API_KEY_STORAGE_KEY)
            .filter(|k| !k.is_empty()))
    }

    fn set(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(());
        }
        let mut entries = self.read_entries()?;
        entries.insert(API_KEY_STORAGE_KEY.to_string(), key.to_string());
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), "stored API key");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(API_KEY_STORAGE_KEY).is_some() {
            self.write_entries(&entries)?;
            tracing::debug!(path = %self.path.display(), "removed API key");
        }
        Ok(())
    }
}

/// Keeps the key in memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a key.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Mutex::new(Some(key.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.key.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.slot().clone().filter(|k| !k.is_empty()))
    }

    fn set(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if !key.is_empty() {
            *self.slot() = Some(key.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("credentials.json"));

        assert_eq!(store.get().unwrap(), None);
        store.set("  my-key  ").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("my-key"));

        let reopened = FileCredentialStore::new(store.path());
        assert_eq!(reopened.get().unwrap().as_deref(), Some("my-key"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_ignores_blank_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.set("   ").unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_uses_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.set("abc").unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[API_KEY_STORAGE_KEY], "abc");
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileCredentialStore::new(&path);
        assert!(matches!(store.get(), Err(ProEditError::Json(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set("k").unwrap();
        store.set("").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("k"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);

        let preset = MemoryCredentialStore::with_key("preset");
        assert_eq!(preset.get().unwrap().as_deref(), Some("preset"));
    }
}
