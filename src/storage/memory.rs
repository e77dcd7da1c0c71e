//! In-memory key-value store

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{KvStore, StorageResult};

/// Non-durable store; state lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("a:b", "{\"x\":1}").unwrap();
        assert_eq!(store.get("a:b").unwrap().as_deref(), Some("{\"x\":1}"));

        store.set("a:b", "{\"x\":2}").unwrap();
        assert_eq!(store.get("a:b").unwrap().as_deref(), Some("{\"x\":2}"));
    }
}
