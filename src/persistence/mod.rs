//! Persistence module for durable key-value storage
//!
//! The rate limiter keeps its attempt history here so that it survives
//! process restarts.

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryKeyValueStore;
pub use sqlite_store::SqliteKeyValueStore;

use thiserror::Error;

/// Errors that can occur during persistence operations
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Trait for string-keyed, string-valued storage backends
///
/// Implementations are synchronous; callers that need an atomic
/// read-modify-write must serialize it themselves.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;

    /// Remove every key (useful for testing)
    fn clear(&self) -> Result<(), PersistenceError>;
}
