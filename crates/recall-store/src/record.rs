//! Memory records and per-user collections.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One stored memory.
///
/// Serde names match the persisted document format: timestamps are epoch
/// seconds, the creation time is stored as `time` and the validity window
/// as `valid_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// Unique identifier within one user's collection
    pub id: u64,

    /// Memory content
    pub content: String,

    /// Creation timestamp (epoch seconds), never mutated
    #[serde(rename = "time")]
    pub created_at: i64,

    /// Importance rank supplied by the caller; higher is kept longer
    pub importance: i32,

    /// Last time this memory's validity was refreshed. Set at creation and
    /// not updated on reads: validity runs from creation.
    #[serde(rename = "last_access_time")]
    pub last_access_at: i64,

    /// Validity window in seconds
    #[serde(rename = "valid_time")]
    pub valid_secs: i64,
}

impl Memory {
    /// Create a new memory stamped at `now`.
    pub fn new(id: u64, content: impl Into<String>, importance: i32, valid_secs: i64, now: i64) -> Self {
        Self {
            id,
            content: content.into(),
            created_at: now,
            importance,
            last_access_at: now,
            valid_secs,
        }
    }

    /// Whether this memory's validity window has elapsed at `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        now - self.last_access_at >= self.valid_secs
    }
}

/// All memories stored for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCollection {
    /// Owning user's external key
    pub user_id: String,

    /// Cached size of `memories`; kept equal to `memories.len()`
    #[serde(default)]
    pub count: usize,

    /// The records, stored under `memory` in the document
    #[serde(rename = "memory", default)]
    pub memories: Vec<Memory>,
}

impl MemoryCollection {
    /// Create an empty collection for a user.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            count: 0,
            memories: Vec::new(),
        }
    }

    /// Recompute the cached count after a mutation.
    pub fn recount(&mut self) {
        self.count = self.memories.len();
    }

    /// Find a memory by id.
    pub fn find(&self, id: u64) -> Option<&Memory> {
        self.memories.iter().find(|m| m.id == id)
    }

    /// Find a memory by id, mutably.
    pub fn find_mut(&mut self, id: u64) -> Option<&mut Memory> {
        self.memories.iter_mut().find(|m| m.id == id)
    }

    /// Generate an id unique within this collection.
    ///
    /// The timestamp is concatenated with a 4-digit random draw
    /// (`now * 10_000 + draw`); the draw is retried while the candidate
    /// collides with an existing id, so creations within the same second
    /// stay distinct.
    pub fn next_id(&self, now: i64) -> u64 {
        let mut rng = rand::rng();
        loop {
            let draw: u64 = rng.random_range(1000..=9999);
            let id = now as u64 * 10_000 + draw;
            if self.find(id).is_none() {
                return id;
            }
        }
    }
}
