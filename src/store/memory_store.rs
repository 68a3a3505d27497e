use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::Storage;

/// Keeps everything in a map owned by the process.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_items<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> Result<T, String> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| "memory storage mutex poisoned".to_string())?;
        Ok(f(&mut items))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        self.with_items(|items| items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.with_items(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    async fn remove_item(&self, key: &str) -> Result<(), String> {
        self.with_items(|items| {
            items.remove(key);
        })
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
