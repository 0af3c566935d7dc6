use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const DEFAULT_CAPACITY: usize = 256;

/// Parsed module values keyed by path, validated against a content hash
#[derive(Debug)]
pub struct ModuleCache {
    entries: Mutex<LruCache<PathBuf, CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    file_hash: String,
    value: Value,
}

impl Default for ModuleCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ModuleCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Cached value for `path`, if it was stored for the same content
    pub fn get(&self, path: &Path, file_hash: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(path)?;
        if entry.file_hash != file_hash {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, path: PathBuf, file_hash: String, value: Value) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(path, CacheEntry { file_hash, value });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

pub fn content_hash(contents: &str) -> String {
    format!("{:x}", md5::compute(contents.as_bytes()))
}
