//! Keyword search scored by token overlap.

use crate::record::MemoryCollection;
use crate::token::tokenize;
use serde::Serialize;

/// One search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: u64,
    /// Fraction of keyword tokens present in the content, in (0, 1]
    pub score: f64,
    pub content: String,
    pub importance: i32,
}

/// Score every memory in a collection against a keyword.
///
/// The score is `|K ∩ M| / |K|` over token sets; repeated tokens count
/// once, and there is no stemming or frequency weighting. Memories sharing
/// no token with the keyword are excluded rather than ranked last; an empty
/// keyword matches nothing. Results come back ordered by descending score,
/// with ties in no particular order.
pub fn search(collection: &MemoryCollection, keyword: &str) -> Vec<SearchHit> {
    let query = tokenize(keyword);
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = collection
        .memories
        .iter()
        .filter_map(|m| {
            let words = tokenize(&m.content);
            let shared = query.intersection(&words).count();
            if shared == 0 {
                return None;
            }
            Some(SearchHit {
                id: m.id,
                score: shared as f64 / query.len() as f64,
                content: m.content.clone(),
                importance: m.importance,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}
