//! # Text Index Module
//!
//! ## Purpose
//! Full-text index consumed by the search executor through the MATCH-and-rank
//! primitive: given a native match expression and a translation it returns
//! raw hits with a relevance score per the index's own ranking function.
//!
//! ## Input/Output Specification
//! - **Input**: [`MatchExpr`] expression trees, translation codes
//! - **Output**: Unordered raw hits `(book, chapter, verse, raw_score)`
//! - **Ranking**: BM25 over verse tokens; the score is opaque to callers,
//!   which only rely on "higher = more relevant"
//!
//! ## Key Features
//! - In-process inverted index built in parallel from the verse store
//! - Contiguous (phrase) expressions match real substrings, not just token
//!   co-occurrence
//! - Negations are only effective inside a conjunction; a query with no
//!   positive support matches nothing
//! - Hit order is unspecified; deterministic ordering is the executor's job

use crate::config::IndexConfig;
use crate::errors::Result;
use crate::storage::VerseEntry;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// The index's native query expression, the compilation target of the
/// executor's translation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchExpr {
    /// One token from the index vocabulary
    Token(String),
    /// Contiguous text that must appear verbatim (case-insensitive)
    Contiguous(String),
    /// Every sub-expression must match
    All(Vec<MatchExpr>),
    /// Any sub-expression may match
    Any(Vec<MatchExpr>),
    /// Documents matching the inner expression are excluded
    Exclude(Box<MatchExpr>),
}

/// One raw hit from the index. Order across hits is unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
    pub raw_score: f64,
}

/// The MATCH-and-rank primitive the executor consumes. The index behind it
/// is an external collaborator; only this surface is relied upon.
#[async_trait]
pub trait TextIndex: Send + Sync {
    /// Execute a match expression over one translation's documents.
    async fn match_query(&self, expr: &MatchExpr, translation: &str) -> Result<Vec<RawHit>>;
}

/// Index statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub translations: Vec<String>,
    pub total_documents: usize,
    pub total_terms: usize,
}

/// One indexed verse.
struct Doc {
    book_id: String,
    chapter: u32,
    verse: u32,
    token_count: usize,
    lower_text: String,
}

/// Per-translation posting lists and document table.
struct TranslationIndex {
    docs: Vec<Doc>,
    /// term -> (doc slot, term frequency)
    postings: HashMap<String, Vec<(usize, u32)>>,
    avg_token_count: f64,
}

/// In-process inverted index with BM25 ranking.
pub struct InvertedIndex {
    config: IndexConfig,
    translations: RwLock<HashMap<String, TranslationIndex>>,
}

impl InvertedIndex {
    /// Create an empty index.
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            translations: RwLock::new(HashMap::new()),
        }
    }

    /// Build (or rebuild) the postings for one translation from scanned
    /// verse entries, fanning the tokenization out across cores.
    pub fn build_translation(&self, translation: &str, entries: &[VerseEntry]) {
        let accumulator: DashMap<String, Vec<(usize, u32)>> = DashMap::new();

        let docs: Vec<Doc> = entries
            .par_iter()
            .enumerate()
            .map(|(slot, entry)| {
                let tokens = tokenize(&entry.text);
                let mut frequencies: HashMap<&str, u32> = HashMap::new();
                for token in &tokens {
                    *frequencies.entry(token.as_str()).or_insert(0) += 1;
                }
                for (token, tf) in frequencies {
                    accumulator
                        .entry(token.to_string())
                        .or_default()
                        .push((slot, tf));
                }
                Doc {
                    book_id: entry.book_id.clone(),
                    chapter: entry.chapter,
                    verse: entry.verse,
                    token_count: tokens.len(),
                    lower_text: entry.text.nfc().collect::<String>().to_lowercase(),
                }
            })
            .collect();

        let mut postings: HashMap<String, Vec<(usize, u32)>> =
            HashMap::with_capacity(accumulator.len());
        for (term, mut list) in accumulator.into_iter() {
            // Parallel accumulation leaves the list unordered.
            list.sort_unstable_by_key(|&(slot, _)| slot);
            postings.insert(term, list);
        }

        let total_tokens: usize = docs.iter().map(|d| d.token_count).sum();
        let avg_token_count = if docs.is_empty() {
            0.0
        } else {
            total_tokens as f64 / docs.len() as f64
        };

        let built = TranslationIndex {
            docs,
            postings,
            avg_token_count,
        };

        tracing::info!(
            "Indexed {} verses with {} distinct terms for {}",
            built.docs.len(),
            built.postings.len(),
            translation
        );
        self.translations
            .write()
            .insert(translation.to_uppercase(), built);
    }

    /// Whether a translation has been indexed.
    pub fn is_built(&self, translation: &str) -> bool {
        self.translations
            .read()
            .contains_key(&translation.to_uppercase())
    }

    /// Get index statistics
    pub fn get_stats(&self) -> IndexStats {
        let guard = self.translations.read();
        let mut translations: Vec<String> = guard.keys().cloned().collect();
        translations.sort();
        IndexStats {
            translations,
            total_documents: guard.values().map(|t| t.docs.len()).sum(),
            total_terms: guard.values().map(|t| t.postings.len()).sum(),
        }
    }

    /// Score every document matching the expression. Returns doc slot ->
    /// accumulated BM25 score.
    fn evaluate(&self, expr: &MatchExpr, index: &TranslationIndex) -> HashMap<usize, f64> {
        match expr {
            MatchExpr::Token(token) => self.score_token(token, index),
            MatchExpr::Contiguous(phrase) => self.score_contiguous(phrase, index),
            MatchExpr::All(children) => {
                let mut positive: Option<HashMap<usize, f64>> = None;
                let mut excluded: Vec<HashMap<usize, f64>> = Vec::new();
                for child in children {
                    if let MatchExpr::Exclude(inner) = child {
                        excluded.push(self.evaluate(inner, index));
                        continue;
                    }
                    let scores = self.evaluate(child, index);
                    positive = Some(match positive {
                        None => scores,
                        Some(acc) => intersect(acc, &scores),
                    });
                }
                // A conjunction with no positive clause has no support.
                let mut result = positive.unwrap_or_default();
                for exclusion in excluded {
                    result.retain(|slot, _| !exclusion.contains_key(slot));
                }
                result
            }
            MatchExpr::Any(children) => {
                let mut result: HashMap<usize, f64> = HashMap::new();
                for child in children {
                    // A bare negation inside a disjunction matches nothing.
                    if matches!(child, MatchExpr::Exclude(_)) {
                        continue;
                    }
                    for (slot, score) in self.evaluate(child, index) {
                        *result.entry(slot).or_insert(0.0) += score;
                    }
                }
                result
            }
            MatchExpr::Exclude(_) => HashMap::new(),
        }
    }

    fn score_token(&self, token: &str, index: &TranslationIndex) -> HashMap<usize, f64> {
        let Some(list) = index.postings.get(token) else {
            return HashMap::new();
        };
        let df = list.len() as f64;
        let n = index.docs.len() as f64;
        let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
        let k1 = self.config.bm25_k1;
        let b = self.config.bm25_b;

        list.iter()
            .map(|&(slot, tf)| {
                let tf = tf as f64;
                let len_norm = index.docs[slot].token_count as f64
                    / index.avg_token_count.max(f64::EPSILON);
                let score = idf * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * len_norm));
                (slot, score)
            })
            .collect()
    }

    /// Candidate docs come from the token intersection; the substring check
    /// over the stored text makes the match contiguous, not co-occurrence.
    fn score_contiguous(&self, phrase: &str, index: &TranslationIndex) -> HashMap<usize, f64> {
        let tokens = tokenize(phrase);
        if tokens.is_empty() {
            return HashMap::new();
        }

        let mut candidates: Option<HashMap<usize, f64>> = None;
        for token in &tokens {
            let scores = self.score_token(token, index);
            candidates = Some(match candidates {
                None => scores,
                Some(acc) => intersect(acc, &scores),
            });
        }

        let needle = phrase.nfc().collect::<String>().to_lowercase();
        let mut result = candidates.unwrap_or_default();
        result.retain(|&slot, _| index.docs[slot].lower_text.contains(&needle));
        result
    }
}

#[async_trait]
impl TextIndex for InvertedIndex {
    async fn match_query(&self, expr: &MatchExpr, translation: &str) -> Result<Vec<RawHit>> {
        let guard = self.translations.read();
        let Some(index) = guard.get(&translation.to_uppercase()) else {
            return Ok(Vec::new());
        };

        let hits = self
            .evaluate(expr, index)
            .into_iter()
            .map(|(slot, raw_score)| {
                let doc = &index.docs[slot];
                RawHit {
                    book_id: doc.book_id.clone(),
                    chapter: doc.chapter,
                    verse: doc.verse,
                    raw_score,
                }
            })
            .collect();
        Ok(hits)
    }
}

/// Intersect two score maps, summing scores of shared documents.
fn intersect(left: HashMap<usize, f64>, right: &HashMap<usize, f64>) -> HashMap<usize, f64> {
    left.into_iter()
        .filter_map(|(slot, score)| right.get(&slot).map(|extra| (slot, score + extra)))
        .collect()
}

/// Shared tokenizer for indexed text and query tokens: NFC-normalized,
/// lowercase words of letters, digits, and internal apostrophes.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.nfc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(book: &str, chapter: u32, verse: u32, text: &str) -> VerseEntry {
        VerseEntry {
            book_id: book.to_string(),
            chapter,
            verse,
            text: text.to_string(),
        }
    }

    fn sample_index() -> InvertedIndex {
        let index = InvertedIndex::new(IndexConfig::default());
        index.build_translation(
            "KJV",
            &[
                entry("JHN", 3, 16, "For God so loved the world"),
                entry("JHN", 11, 35, "Jesus wept"),
                entry("1JN", 4, 8, "God is love"),
                entry("PSA", 23, 1, "The LORD is my shepherd"),
            ],
        );
        index
    }

    #[tokio::test]
    async fn test_token_match() {
        let index = sample_index();
        let hits = index
            .match_query(&MatchExpr::Token("god".to_string()), "KJV")
            .await
            .unwrap();
        let mut books: Vec<&str> = hits.iter().map(|h| h.book_id.as_str()).collect();
        books.sort();
        assert_eq!(books, vec!["1JN", "JHN"]);
        assert!(hits.iter().all(|h| h.raw_score > 0.0));
    }

    #[tokio::test]
    async fn test_conjunction_and_exclusion() {
        let index = sample_index();

        let expr = MatchExpr::All(vec![
            MatchExpr::Token("god".to_string()),
            MatchExpr::Token("love".to_string()),
        ]);
        let hits = index.match_query(&expr, "KJV").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].book_id, "1JN");

        let expr = MatchExpr::All(vec![
            MatchExpr::Token("god".to_string()),
            MatchExpr::Exclude(Box::new(MatchExpr::Token("love".to_string()))),
        ]);
        let hits = index.match_query(&expr, "KJV").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].book_id, "JHN");
        assert_eq!(hits[0].chapter, 3);
    }

    #[tokio::test]
    async fn test_pure_negation_matches_nothing() {
        let index = sample_index();
        let expr = MatchExpr::Exclude(Box::new(MatchExpr::Token("god".to_string())));
        assert!(index.match_query(&expr, "KJV").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_contiguous_requires_substring() {
        let index = InvertedIndex::new(IndexConfig::default());
        index.build_translation(
            "KJV",
            &[
                entry("JHN", 1, 1, "the Word was with God"),
                // Both tokens present but not adjacent.
                entry("GEN", 1, 1, "the word of God was heard"),
            ],
        );

        let expr = MatchExpr::Contiguous("word was".to_string());
        let hits = index.match_query(&expr, "KJV").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].book_id, "JHN");
    }

    #[tokio::test]
    async fn test_unknown_translation_is_empty() {
        let index = sample_index();
        let hits = index
            .match_query(&MatchExpr::Token("god".to_string()), "WEB")
            .await
            .unwrap();
        assert!(hits.is_empty());
        assert!(!index.is_built("WEB"));
        assert!(index.is_built("kjv"));
    }

    #[tokio::test]
    async fn test_disjunction_unions_hits() {
        let index = sample_index();
        let expr = MatchExpr::Any(vec![
            MatchExpr::Token("wept".to_string()),
            MatchExpr::Token("shepherd".to_string()),
        ]);
        let hits = index.match_query(&expr, "KJV").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("For God so loved the world,"),
            vec!["for", "god", "so", "loved", "the", "world"]
        );
        assert_eq!(tokenize("God's love!"), vec!["god's", "love"]);
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn test_stats() {
        let index = sample_index();
        let stats = index.get_stats();
        assert_eq!(stats.translations, vec!["KJV"]);
        assert_eq!(stats.total_documents, 4);
        assert!(stats.total_terms > 0);
    }
}
