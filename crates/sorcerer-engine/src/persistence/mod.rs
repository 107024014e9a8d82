pub mod raw;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::editing::EditorState;
use crate::models::ContentState;
use raw::{RawContent, RawContentError};

/// Message shown after an explicit save
pub const SAVE_ACKNOWLEDGMENT: &str = "Content saved successfully!";

/// Default storage key for the document snapshot
pub const DEFAULT_STORAGE_KEY: &str = "draftEditorContent";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Stored snapshot under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("Stored snapshot under '{key}' is inconsistent: {source}")]
    Inconsistent {
        key: String,
        source: RawContentError,
    },
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl PersistenceError {
    /// Whether the stored data itself is unreadable (as opposed to the storage failing)
    pub fn is_corrupt_snapshot(&self) -> bool {
        matches!(
            self,
            PersistenceError::Corrupt { .. } | PersistenceError::Inconsistent { .. }
        )
    }
}

/// A durable string key-value slot store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Read { path, source })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Write beside the target, then rename over it
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StorageError::Write { path, source })
    }
}

/// In-process storage, used by tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What to do when the stored snapshot cannot be read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptSnapshotPolicy {
    /// Keep the bad data under `<key>.corrupt` and start with an empty document
    #[default]
    StartEmpty,
    /// Refuse to start
    Fail,
}

/// Reads and writes the document snapshot under one storage key
#[derive(Debug)]
pub struct Persistence<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialize `content` and overwrite the slot
    pub fn save(&mut self, content: &ContentState) -> Result<(), PersistenceError> {
        let raw = RawContent::from_content(content);
        let json = serde_json::to_string(&raw).map_err(PersistenceError::Serialize)?;
        self.storage.set(&self.key, &json)?;
        log::debug!("saved {} blocks under '{}'", raw.blocks.len(), self.key);
        Ok(())
    }

    /// Load the stored document, or a fresh empty one when nothing is stored
    pub fn load(&self) -> Result<EditorState, PersistenceError> {
        let Some(json) = self.storage.get(&self.key)? else {
            log::info!("no snapshot under '{}', starting empty", self.key);
            return Ok(EditorState::empty());
        };

        let raw: RawContent =
            serde_json::from_str(&json).map_err(|source| PersistenceError::Corrupt {
                key: self.key.clone(),
                source,
            })?;
        let content = raw
            .into_content()
            .map_err(|source| PersistenceError::Inconsistent {
                key: self.key.clone(),
                source,
            })?;

        log::info!(
            "loaded {} blocks from '{}'",
            content.blocks().len(),
            self.key
        );
        Ok(EditorState::with_content(content))
    }

    /// Load, applying `policy` if the stored snapshot is unreadable
    pub fn load_with_policy(
        &mut self,
        policy: CorruptSnapshotPolicy,
    ) -> Result<EditorState, PersistenceError> {
        match self.load() {
            Err(err) if err.is_corrupt_snapshot() && policy == CorruptSnapshotPolicy::StartEmpty => {
                log::warn!("{err}; starting with an empty document");
                if let Some(json) = self.storage.get(&self.key)? {
                    let backup_key = format!("{}.corrupt", self.key);
                    self.storage.set(&backup_key, &json)?;
                    log::warn!("unreadable snapshot kept under '{backup_key}'");
                }
                Ok(EditorState::empty())
            }
            other => other,
        }
    }
}
