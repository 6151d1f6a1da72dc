//! Snapshot cache collaborators.
//!
//! A cache maps a list URI to a JSON snapshot of the parsed list. The loader
//! treats a snapshot it gets back exactly like freshly parsed data; whether an
//! entry is still fresh is the cache's business.

mod dir;

pub use dir::DirListCache;

use std::collections::HashMap;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};

/// Trait for storing list snapshots by URI
pub trait ListCache: Send + Sync {
    /// Fetch a snapshot previously stored under `uri`
    fn fetch_by_uri(&self, uri: &str) -> Option<String>;

    /// Store a snapshot under `uri`. Returns whether it was stored.
    fn store_by_uri(&self, uri: &str, snapshot: &str) -> bool;
}

/// Nil cache - never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NilListCache;

impl ListCache for NilListCache {
    fn fetch_by_uri(&self, _uri: &str) -> Option<String> {
        None
    }

    fn store_by_uri(&self, _uri: &str, _snapshot: &str) -> bool {
        false
    }
}

/// Unbounded in-memory cache
#[derive(Debug, Default)]
pub struct MemoryListCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ListCache for MemoryListCache {
    fn fetch_by_uri(&self, uri: &str) -> Option<String> {
        self.entries.read().get(uri).cloned()
    }

    fn store_by_uri(&self, uri: &str, snapshot: &str) -> bool {
        self.entries
            .write()
            .insert(uri.to_string(), snapshot.to_string());
        true
    }
}

/// Bounded in-memory cache evicting the least recently used snapshot
pub struct LruListCache {
    entries: Mutex<LruCache<String, String>>,
}

impl LruListCache {
    /// Create a cache holding at most `capacity` snapshots (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ListCache for LruListCache {
    fn fetch_by_uri(&self, uri: &str) -> Option<String> {
        self.entries.lock().get(uri).cloned()
    }

    fn store_by_uri(&self, uri: &str, snapshot: &str) -> bool {
        self.entries
            .lock()
            .put(uri.to_string(), snapshot.to_string());
        true
    }
}
