//! TTL file cache for downloaded market datasets.
//!
//! Each data source keeps exactly one dataset per key. A dataset is a flat
//! blob (JSON or plain text); the file modification time is the sole
//! freshness signal. Stale contents stay readable so callers can degrade to
//! them when a refresh fails.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Source of the current time, injectable for deterministic tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A store of cached datasets, one per key, with a fixed TTL.
pub trait CacheStore: Send + Sync {
    /// Reports whether a dataset exists and is younger than the store TTL.
    fn is_valid(&self, key: &str) -> bool;

    /// Returns the dataset contents, fresh or stale.
    fn read(&self, key: &str) -> Option<String>;

    /// Replaces the dataset contents wholesale.
    fn write(&self, key: &str, contents: &str) -> io::Result<()>;
}

/// File-backed store. Each key maps to one file under `dir`.
pub struct FileStore {
    dir: PathBuf,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self::with_clock(dir, ttl, Box::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            clock,
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl CacheStore for FileStore {
    fn is_valid(&self, key: &str) -> bool {
        let Ok(metadata) = fs::metadata(self.path(key)) else {
            return false;
        };
        let Ok(modified) = metadata.modified() else {
            return false;
        };
        match self.clock.now().duration_since(modified) {
            Ok(age) => age < self.ttl,
            // mtime ahead of the clock counts as fresh
            Err(_) => true,
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Write to a sibling temp file and rename so readers never observe
        // a partially written dataset.
        let tmp = self.path(&format!("{key}.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, self.path(key))?;
        debug!("Cache WRITE for {key}");
        Ok(())
    }
}

struct MemoryEntry {
    contents: String,
    written_at: SystemTime,
}

/// In-memory store with the same TTL semantics as [`FileStore`]. Lets tests
/// exercise providers without touching the filesystem.
pub struct MemoryStore {
    ttl: Duration,
    clock: Box<dyn Clock>,
    inner: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl CacheStore for MemoryStore {
    fn is_valid(&self, key: &str) -> bool {
        let entries = self.inner.lock().unwrap();
        let Some(entry) = entries.get(key) else {
            return false;
        };
        match self.clock.now().duration_since(entry.written_at) {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        let entries = self.inner.lock().unwrap();
        entries.get(key).map(|entry| entry.contents.clone())
    }

    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        let mut entries = self.inner.lock().unwrap();
        entries.insert(
            key.to_string(),
            MemoryEntry {
                contents: contents.to_string(),
                written_at: self.clock.now(),
            },
        );
        Ok(())
    }
}
