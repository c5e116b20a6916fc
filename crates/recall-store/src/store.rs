//! The memory store facade: create, search, update, delete, list.

use crate::error::{MemoryError, Result};
use crate::record::{Memory, MemoryCollection};
use crate::retention::enforce_capacity;
use crate::search::{self, SearchHit};
use crate::storage::Storage;
use camino::Utf8PathBuf;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding per-user documents
    pub data_dir: Utf8PathBuf,
    /// Maximum memories kept per user
    pub max_memories: usize,
    /// How long an operation may wait for the user's lock
    pub lock_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Storage::default_dir(),
            max_memories: 100,
            lock_timeout: Duration::from_secs(5),
        }
    }
}

/// Per-user memory store.
///
/// Every operation runs its whole load/mutate/save cycle under that user's
/// exclusive lock, so concurrent calls for the same user serialize while
/// different users proceed independently. Lock acquisition is bounded by
/// `lock_timeout` and fails with [`MemoryError::Busy`] instead of blocking
/// forever.
pub struct MemoryStore {
    storage: Storage,
    config: StoreConfig,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MemoryStore {
    /// Create a store with the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        debug!(data_dir = %config.data_dir, max_memories = config.max_memories, "opening memory store");
        Self {
            storage: Storage::new(config.data_dir.clone()),
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a store with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(StoreConfig::default())
    }

    /// Record a new memory and return its id.
    ///
    /// A user with no prior collection gets one implicitly. After the
    /// insertion the capacity bound is enforced before anything is written.
    pub fn create(
        &self,
        user_id: &str,
        content: impl Into<String>,
        importance: i32,
        valid_secs: i64,
    ) -> Result<u64> {
        let lock = self.user_lock(user_id);
        let _guard = self.acquire(&lock, user_id)?;

        let now = chrono::Utc::now().timestamp();
        let mut book = self.storage.load(user_id)?;

        let id = book.next_id(now);
        book.memories.push(Memory::new(id, content, importance, valid_secs, now));
        book.recount();

        let evicted = enforce_capacity(&mut book.memories, self.config.max_memories, now);
        if evicted > 0 {
            debug!(user = %user_id, evicted, "capacity enforced");
            book.recount();
        }

        self.storage.save(&book)?;
        Ok(id)
    }

    /// Search a user's memories by keyword. Missing collections and
    /// keywords overlapping nothing both yield an empty list.
    pub fn search(&self, user_id: &str, keyword: &str) -> Result<Vec<SearchHit>> {
        let lock = self.user_lock(user_id);
        let _guard = self.acquire(&lock, user_id)?;

        let book = self.storage.load(user_id)?;
        Ok(search::search(&book, keyword))
    }

    /// Replace a memory's content and importance. Returns `Ok(false)` when
    /// the id (or the whole collection) does not exist; nothing is written
    /// in that case.
    pub fn update(
        &self,
        user_id: &str,
        id: u64,
        content: impl Into<String>,
        importance: i32,
    ) -> Result<bool> {
        let lock = self.user_lock(user_id);
        let _guard = self.acquire(&lock, user_id)?;

        let mut book = self.storage.load(user_id)?;
        let Some(memory) = book.find_mut(id) else {
            return Ok(false);
        };

        memory.content = content.into();
        memory.importance = importance;

        self.storage.save(&book)?;
        Ok(true)
    }

    /// Delete a memory by id. Returns `Ok(false)` when the id does not
    /// exist; nothing is written in that case.
    pub fn delete(&self, user_id: &str, id: u64) -> Result<bool> {
        let lock = self.user_lock(user_id);
        let _guard = self.acquire(&lock, user_id)?;

        let mut book = self.storage.load(user_id)?;
        let Some(index) = book.memories.iter().position(|m| m.id == id) else {
            return Ok(false);
        };

        book.memories.remove(index);
        book.recount();

        self.storage.save(&book)?;
        Ok(true)
    }

    /// List a user's memories, optionally restricted to the ids a keyword
    /// search would return. Never mutates state.
    pub fn list(&self, user_id: &str, keyword: Option<&str>) -> Result<Vec<Memory>> {
        let lock = self.user_lock(user_id);
        let _guard = self.acquire(&lock, user_id)?;

        let book = self.storage.load(user_id)?;
        match keyword {
            Some(keyword) => {
                let matched: Vec<u64> = search::search(&book, keyword)
                    .into_iter()
                    .map(|hit| hit.id)
                    .collect();
                Ok(book
                    .memories
                    .into_iter()
                    .filter(|m| matched.contains(&m.id))
                    .collect())
            }
            None => Ok(book.memories),
        }
    }

    /// The lock serializing operations for one user.
    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn acquire<'a>(
        &self,
        lock: &'a Arc<Mutex<()>>,
        user_id: &str,
    ) -> Result<parking_lot::MutexGuard<'a, ()>> {
        lock.try_lock_for(self.config.lock_timeout).ok_or_else(|| {
            warn!(user = %user_id, "lock not acquired within timeout");
            MemoryError::Busy {
                user_id: user_id.to_string(),
            }
        })
    }
}
