//! Word-level tokenization for memory content and search keywords.
//!
//! Splitting on word boundaries works for Latin scripts but produces nothing
//! useful for CJK, where words are not space-delimited. CJK runs are
//! segmented into character bigrams instead, so Chinese/Japanese/Korean
//! content gets usable tokens.

use std::collections::HashSet;

/// Check whether a character belongs to a CJK script.
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'   // CJK Unified Basic
        | '\u{3400}'..='\u{4DBF}' // CJK Extension A
        | '\u{F900}'..='\u{FAFF}' // CJK Compatibility
        | '\u{3040}'..='\u{30FF}' // Hiragana + Katakana
        | '\u{AC00}'..='\u{D7AF}' // Hangul
    )
}

/// Tokenize text into a deduplicated set of word tokens.
///
/// Latin and digit runs are split on non-alphanumeric boundaries and
/// lowercased. Adjacent CJK character pairs become bigrams; a CJK character
/// with no CJK neighbor is kept as a single-character token so one-character
/// queries still match. Empty input yields an empty set.
pub fn tokenize(text: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();

    for chunk in text.split(|c: char| !c.is_alphanumeric()) {
        if chunk.is_empty() {
            continue;
        }
        let chars: Vec<char> = chunk.chars().collect();
        let mut word = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if is_cjk(c) {
                if !word.is_empty() {
                    tokens.insert(word.to_lowercase());
                    word.clear();
                }
                let prev_cjk = i > 0 && is_cjk(chars[i - 1]);
                let next_cjk = chars.get(i + 1).copied().is_some_and(is_cjk);
                if next_cjk {
                    let mut bigram = String::with_capacity(8);
                    bigram.push(c);
                    bigram.push(chars[i + 1]);
                    tokens.insert(bigram);
                } else if !prev_cjk {
                    tokens.insert(c.to_string());
                }
            } else {
                word.push(c);
            }
        }

        if !word.is_empty() {
            tokens.insert(word.to_lowercase());
        }
    }

    tokens
}
