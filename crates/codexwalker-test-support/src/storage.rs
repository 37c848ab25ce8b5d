//! Test stores — mock `PersistentStore` implementations for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use codexwalker_core::storage::PersistentStore;

/// A store backed by a shared map. Clones see the same contents, so a test
/// can keep a handle after moving the store into the code under test.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    /// Writes a raw value, bypassing the code under test.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
    }
}

impl PersistentStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), String> {
        self.items.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }
}

/// A store that is always empty and rejects every write.
#[derive(Debug)]
pub struct FailingStore;

impl PersistentStore for FailingStore {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&mut self, _key: &str, _value: String) -> Result<(), String> {
        Err("quota exceeded".into())
    }
}
