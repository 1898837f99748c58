use crate::core::store::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// In-memory store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let value = items.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        value
    }

    fn set_item(&self, key: &str, value: &str) {
        let mut items = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("Store PUT for key: {}", key);
        items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        let mut items = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        debug!("Store REMOVE for key: {}", key);
    }
}
