//! Per-user memory store for chat agents.
//!
//! Provides:
//! - Word-level tokenization (Latin words + CJK bigrams)
//! - Memory records with importance and time-based validity
//! - One JSON document per user, written atomically
//! - Capacity-bounded retention with priority eviction
//! - Keyword search scored by token overlap

pub mod error;
pub mod record;
pub mod retention;
pub mod search;
pub mod storage;
pub mod store;
pub mod token;

pub use error::{MemoryError, Result};
pub use record::{Memory, MemoryCollection};
pub use search::SearchHit;
pub use storage::Storage;
pub use store::{MemoryStore, StoreConfig};
pub use token::tokenize;
