use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::CoreError;

use super::kv::KeyValueStore;

/// File-backed [`KeyValueStore`]: one JSON object per namespace, stored as
/// `<root>/<namespace>.json`.
///
/// Every `set`/`remove` rewrites the whole namespace file, matching the
/// full-overwrite persistence contract — a write is atomic from the
/// caller's perspective and there is no partial-collection state on disk.
/// Single-process, single-writer by assumption; the mutex only serializes
/// read-modify-write cycles within this process.
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        // Namespaces like "user:<uuid>" must map to a safe file name.
        let safe: String = namespace
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }

    fn read_namespace(&self, namespace: &str) -> Result<HashMap<String, String>, CoreError> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(&path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&contents)
            .map_err(|e| CoreError::Deserialization(format!("Corrupt namespace file {path:?}: {e}")))?;
        Ok(entries)
    }

    fn write_namespace(
        &self,
        namespace: &str,
        entries: &HashMap<String, String>,
    ) -> Result<(), CoreError> {
        let path = self.namespace_path(namespace);
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        std::fs::write(&path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.read_namespace(namespace)?.remove(key))
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_namespace(namespace)?;
        entries.insert(key.to_string(), value.to_string());
        self.write_namespace(namespace, &entries)
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_namespace(namespace)?;
        if entries.remove(key).is_some() {
            self.write_namespace(namespace, &entries)?;
        }
        Ok(())
    }
}
