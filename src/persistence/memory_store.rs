//! In-memory implementation of the KeyValueStore trait

use super::{KeyValueStore, PersistenceError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Volatile key-value store, used in tests and when no database is configured
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, PersistenceError> {
        self.entries.lock().map_err(|_| PersistenceError::LockPoisoned)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.entries()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get("rateLimit_login").unwrap().is_none());

        store.set("rateLimit_login", "[1,2]").unwrap();
        assert_eq!(store.get("rateLimit_login").unwrap().as_deref(), Some("[1,2]"));

        store.remove("rateLimit_login").unwrap();
        store.remove("rateLimit_login").unwrap();
        assert!(store.get("rateLimit_login").unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let store = MemoryKeyValueStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.clear().unwrap();

        assert!(store.get("a").unwrap().is_none());
        assert!(store.get("b").unwrap().is_none());
    }
}
