pub mod controller;
pub mod editing;
pub mod models;
pub mod persistence;

// Re-export key types for easier usage
pub use controller::{Editor, KeyOutcome};
pub use editing::{
    ChangeType, CommandStatus, EditorCommand, EditorState, Key, KeyInput, Motion, TRIGGERS,
    TriggerRule,
};
pub use models::*;
pub use persistence::{
    CorruptSnapshotPolicy, DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, Persistence,
    PersistenceError, SAVE_ACKNOWLEDGMENT, Storage, StorageError,
};
