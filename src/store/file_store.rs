//! Storage backed by a single JSON object on disk.
//!
//! Every write goes to a sibling temp file (0600 on unix, since it holds
//! bearer credentials) that is then renamed over the state file, so a crash
//! never leaves a half-written file behind. A missing file reads as empty.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::Storage;

type Items = BTreeMap<String, String>;

pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<String, String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(format!("Failed to read {}: {}", self.path.display(), e)),
        }
    }

    fn parse(&self, contents: &str) -> Result<Items, String> {
        if contents.trim().is_empty() {
            return Ok(Items::new());
        }
        serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse {}: {}", self.path.display(), e))
    }

    async fn load(&self) -> Result<Items, String> {
        let contents = self.read().await?;
        self.parse(&contents)
    }

    async fn save(&self, items: &Items) -> Result<(), String> {
        let contents = serde_json::to_vec_pretty(items)
            .map_err(|e| format!("Failed to serialize state: {}", e))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &contents))
            .await
            .map_err(|e| format!("State writer did not finish: {}", e))??;

        debug!(path = %self.path.display(), keys = items.len(), "State file written");
        Ok(())
    }

    /// An unparseable file is replaced rather than blocking every later write.
    async fn update(&self, f: impl FnOnce(&mut Items) -> bool + Send) -> Result<(), String> {
        let _guard = self.lock.lock().await;
        let contents = self.read().await?;
        let mut items = match self.parse(&contents) {
            Ok(items) => items,
            Err(e) => {
                warn!("{}; starting from an empty state", e);
                Items::new()
            }
        };
        if f(&mut items) {
            self.save(&items).await?;
        }
        Ok(())
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), String> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| format!("Failed to create temp file in {}: {}", dir.display(), e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| format!("Failed to write {}: {}", tmp.path().display(), e))?;
    tmp.persist(path)
        .map_err(|e| format!("Failed to replace {}: {}", path.display(), e.error))?;
    Ok(())
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<(), String> {
        self.update(|items| items.remove(key).is_some()).await
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<(), String> {
        self.update(|items| {
            let mut changed = false;
            for key in keys {
                changed |= items.remove(*key).is_some();
            }
            changed
        })
        .await
    }
}
