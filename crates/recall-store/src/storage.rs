//! JSON document storage, one document per user.

use crate::error::{MemoryError, Result};
use crate::record::MemoryCollection;
use camino::Utf8PathBuf;
use std::fs;
use std::io::Write;

/// File-backed storage keyed by user id.
///
/// Each user's collection lives in a single JSON document; saves replace the
/// document atomically so a concurrent reader sees either the old or the new
/// state, never a partial write.
#[derive(Debug, Clone)]
pub struct Storage {
    /// Directory holding the per-user documents
    data_dir: Utf8PathBuf,
}

impl Storage {
    /// Create a storage instance rooted at the given directory.
    pub fn new(data_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Get the default data directory.
    ///
    /// Priority:
    /// 1. RECALL_DATA_DIR environment variable (if set)
    /// 2. <platform data dir>/recall (e.g. ~/.local/share/recall)
    pub fn default_dir() -> Utf8PathBuf {
        if let Ok(custom) = std::env::var("RECALL_DATA_DIR") {
            return Utf8PathBuf::from(custom);
        }

        match dirs::data_dir().and_then(|d| Utf8PathBuf::from_path_buf(d).ok()) {
            Some(base) => base.join("recall"),
            None => Utf8PathBuf::from(".recall"),
        }
    }

    /// Path of the document for a user.
    pub fn document_path(&self, user_id: &str) -> Utf8PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_key(user_id)))
    }

    /// Load a user's collection. A missing document yields a fresh empty
    /// collection; a document that exists but does not parse is an error.
    pub fn load(&self, user_id: &str) -> Result<MemoryCollection> {
        let path = self.document_path(user_id);
        if !path.exists() {
            return Ok(MemoryCollection::empty(user_id));
        }

        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|source| {
            tracing::warn!(user = %user_id, path = %path, "memory document failed to parse");
            MemoryError::Corrupt {
                user_id: user_id.to_string(),
                source,
            }
        })
    }

    /// Save a collection, atomically replacing the previous document.
    pub fn save(&self, collection: &MemoryCollection) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;

        let path = self.document_path(&collection.user_id);
        let json = serde_json::to_vec_pretty(collection).map_err(std::io::Error::from)?;

        // Write to a temp file in the same directory, then rename over the
        // target so the replacement is atomic.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&path).map_err(|e| MemoryError::Unavailable(e.error))?;

        Ok(())
    }

    /// Whether a document exists for a user.
    pub fn exists(&self, user_id: &str) -> bool {
        self.document_path(user_id).exists()
    }
}

/// Map an arbitrary user key to a safe file name. ASCII alphanumerics and
/// `._-` pass through; everything else is percent-encoded byte-wise, so keys
/// cannot escape the data directory.
fn sanitize_key(user_id: &str) -> String {
    let mut out = String::with_capacity(user_id.len());
    for b in user_id.bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Memory;
    use tempfile::tempdir;

    fn storage_in(dir: &tempfile::TempDir) -> Storage {
        Storage::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap())
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir);

        let book = storage.load("nobody").unwrap();
        assert_eq!(book.user_id, "nobody");
        assert_eq!(book.count, 0);
        assert!(book.memories.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir);

        let mut book = MemoryCollection::empty("u1");
        book.memories.push(Memory::new(42, "remember this", 3, 3600, 1_700_000_000));
        book.recount();
        storage.save(&book).unwrap();

        let loaded = storage.load("u1").unwrap();
        assert_eq!(loaded.count, 1);
        assert_eq!(loaded.memories[0].id, 42);
        assert_eq!(loaded.memories[0].content, "remember this");
        assert_eq!(loaded.memories[0].valid_secs, 3600);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir);

        std::fs::write(storage.document_path("u1"), "{not json").unwrap();
        let err = storage.load("u1").unwrap_err();
        assert!(matches!(err, MemoryError::Corrupt { .. }));
        // The broken document is left in place.
        assert!(storage.exists("u1"));
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("alice_01"), "alice_01");
        assert_eq!(sanitize_key("../evil"), "..%2Fevil");
        assert_eq!(sanitize_key("qq:12345"), "qq%3A12345");
    }

    #[test]
    fn test_save_creates_data_dir() {
        let dir = tempdir().unwrap();
        let nested = Utf8PathBuf::from_path_buf(dir.path().join("a/b")).unwrap();
        let storage = Storage::new(nested);

        let book = MemoryCollection::empty("u1");
        storage.save(&book).unwrap();
        assert!(storage.exists("u1"));
    }
}
