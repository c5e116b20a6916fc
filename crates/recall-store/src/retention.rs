//! Capacity enforcement for a user's collection.

use crate::record::Memory;

/// Enforce the capacity bound after an insertion. Returns how many memories
/// were dropped.
///
/// Nothing happens at or under capacity. Over capacity, expired memories are
/// dropped first, unconditionally. If the collection is still too large, the
/// remainder is sorted ascending by `(importance, last_access_at,
/// created_at)` and the smallest entries are dropped, keeping the
/// `max_capacity` largest: higher importance wins, then more recent access,
/// then more recent creation. Ties across all three keys are unordered.
pub fn enforce_capacity(memories: &mut Vec<Memory>, max_capacity: usize, now: i64) -> usize {
    if memories.len() <= max_capacity {
        return 0;
    }

    let before = memories.len();
    memories.retain(|m| !m.is_expired(now));

    if memories.len() > max_capacity {
        memories.sort_by_key(|m| (m.importance, m.last_access_at, m.created_at));
        let excess = memories.len() - max_capacity;
        memories.drain(..excess);
    }

    before - memories.len()
}
