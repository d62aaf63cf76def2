//! # Search Engine Module
//!
//! ## Purpose
//! Main engine hosting the two exposed operations: verse lookup (resolver +
//! verse store) and full-text search (query compiler + text index), with
//! deterministic ordering and catalog enrichment.
//!
//! ## Input/Output Specification
//! - **Input**: Citation strings, search strings, translation codes, limits
//! - **Output**: Enriched verse data and ordered search results
//! - **Ordering contract**: relevance score descending; ties broken by
//!   canonical book order, then chapter, then verse, regardless of the
//!   order the index returns hits in
//!
//! ## Key Features
//! - Query tree translated into the index's native match expression
//! - Phrase results post-verified as contiguous substrings; index false
//!   positives are dropped
//! - Truncation to the caller's limit happens after ordering, never before
//! - Index calls run under a configured timeout and report `SearchTimeout`
//!   instead of retrying

use crate::aggregate::{aggregate, SearchSummary};
use crate::canon::{Book, Canon};
use crate::config::Config;
use crate::errors::{Result, ScriptureError};
use crate::index::{MatchExpr, TextIndex};
use crate::query::{self, QueryNode, SearchQuery};
use crate::reference::{Reference, Resolver};
use crate::storage::VerseStore;
use crate::utils::TextUtils;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Main search engine
pub struct SearchEngine {
    config: Arc<Config>,
    canon: Arc<Canon>,
    resolver: Resolver,
    store: Arc<dyn VerseStore>,
    index: Arc<dyn TextIndex>,
}

/// Book metadata attached to results, looked up from the catalog rather
/// than stored redundantly in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInfo {
    pub id: String,
    pub name: String,
    pub testament: String,
    pub author: String,
    pub genre: String,
    pub canonical_order: u32,
}

impl BookInfo {
    fn from_book(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            name: book.name.to_string(),
            testament: book.testament.code().to_string(),
            author: book.author.to_string(),
            genre: book.genre.to_string(),
            canonical_order: book.canonical_order,
        }
    }
}

/// One search hit with verse text and catalog enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display reference, e.g. "John 3:16"
    pub reference: String,
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    /// Short preview of the verse text
    pub snippet: String,
    /// Opaque ordering key; higher = more relevant
    pub relevance_score: f64,
    pub book: BookInfo,
}

/// Search results plus their summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub summary: SearchSummary,
}

/// Whether a lookup covered one verse or a same-chapter range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassageType {
    SingleVerse,
    VerseRange,
}

/// Text of one verse within a lookup response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseText {
    pub verse: u32,
    pub text: String,
}

/// Lookup response: the resolved passage with its text and book metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseData {
    /// Display reference, e.g. "Romans 8:28-30"
    pub reference: String,
    pub translation: String,
    pub passage_type: PassageType,
    pub chapter: u32,
    pub verse_count: usize,
    /// Combined text; ranges carry `[n]` verse markers
    pub text: String,
    pub verses: Vec<VerseText>,
    pub book: BookInfo,
}

impl SearchEngine {
    /// Create a new engine over the catalog and its collaborators.
    pub fn new(
        config: Arc<Config>,
        canon: Arc<Canon>,
        store: Arc<dyn VerseStore>,
        index: Arc<dyn TextIndex>,
    ) -> Self {
        let resolver = Resolver::new(canon.clone());
        Self {
            config,
            canon,
            resolver,
            store,
            index,
        }
    }

    /// Resolve a citation and fetch its text.
    ///
    /// The translation defaults to the configured one when not named.
    pub async fn lookup(&self, raw: &str, translation: Option<&str>) -> Result<VerseData> {
        let translation = self.effective_translation(translation);
        let reference = self.resolver.resolve(raw, &translation)?;
        self.ensure_translation(&translation).await?;

        let mut verses = Vec::with_capacity(reference.verse_count() as usize);
        for verse in reference.verses() {
            if let Some(text) = self
                .store
                .fetch(&translation, &reference.book_id, reference.chapter, verse)
                .await?
            {
                verses.push(VerseText { verse, text });
            }
        }

        if verses.is_empty() {
            return Err(ScriptureError::VerseNotFound {
                reference: reference.display(&self.canon),
                translation,
            });
        }

        let book = self.canon.book(&reference.book_id).ok_or_else(|| {
            ScriptureError::Internal {
                message: format!("resolved book {} missing from catalog", reference.book_id),
            }
        })?;

        Ok(self.format_verse_data(&reference, &translation, verses, book))
    }

    /// Compile and execute a search, returning ordered results with their
    /// summary statistics.
    pub async fn search(
        &self,
        raw_query: &str,
        translation: Option<&str>,
        limit: Option<usize>,
    ) -> Result<SearchOutcome> {
        let translation = self.effective_translation(translation);
        let limit = limit.unwrap_or(self.config.search.default_max_results);

        self.validate_query(raw_query, limit)?;
        self.ensure_translation(&translation).await?;

        let query = query::compile(raw_query)?;
        tracing::debug!("Compiled query '{}' to {}", raw_query, query.root);

        let results = self.execute(&query, &translation, limit).await?;
        let summary = aggregate(&results);

        Ok(SearchOutcome { results, summary })
    }

    /// Execute a compiled query against the text index.
    ///
    /// Owns the total ordering contract: score descending, ties broken by
    /// canonical order, chapter, verse. Truncation happens after ordering.
    pub async fn execute(
        &self,
        query: &SearchQuery,
        translation: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let expr = translate(&query.root);
        let timeout_ms = self.config.search.search_timeout_ms;

        let hits = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.index.match_query(&expr, translation),
        )
        .await
        .map_err(|_| ScriptureError::SearchTimeout { timeout_ms })??;

        let required_phrases = query.required_phrases();
        let mut results = Vec::with_capacity(hits.len());

        for hit in hits {
            let Some(book) = self.canon.book(&hit.book_id) else {
                tracing::warn!("Index hit for unknown book {}, dropping", hit.book_id);
                continue;
            };
            // The store is the source of truth for text; a hit the store
            // cannot back is dropped.
            let Some(text) = self
                .store
                .fetch(translation, &hit.book_id, hit.chapter, hit.verse)
                .await?
            else {
                continue;
            };

            // Phrase search is a hard guarantee, not a ranking hint.
            let lower = text.to_lowercase();
            if !required_phrases
                .iter()
                .all(|phrase| lower.contains(&phrase.to_lowercase()))
            {
                continue;
            }

            let reference = Reference {
                book_id: hit.book_id.clone(),
                chapter: hit.chapter,
                verse_start: hit.verse,
                verse_end: hit.verse,
                translation: translation.to_string(),
            };
            results.push(SearchResult {
                reference: reference.display(&self.canon),
                book_id: hit.book_id,
                chapter: hit.chapter,
                verse: hit.verse,
                snippet: TextUtils::extract_preview(&text, self.config.search.snippet_words),
                text,
                relevance_score: hit.raw_score,
                book: BookInfo::from_book(book),
            });
        }

        results.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.book.canonical_order.cmp(&b.book.canonical_order))
                .then_with(|| a.chapter.cmp(&b.chapter))
                .then_with(|| a.verse.cmp(&b.verse))
        });
        results.truncate(limit);

        Ok(results)
    }

    fn effective_translation(&self, translation: Option<&str>) -> String {
        translation
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.config.search.default_translation)
            .to_uppercase()
    }

    async fn ensure_translation(&self, translation: &str) -> Result<()> {
        if self.store.has_translation(translation).await? {
            return Ok(());
        }
        Err(ScriptureError::TranslationNotFound {
            translation: translation.to_string(),
            available: self.store.translations().await?,
        })
    }

    /// Validate raw query and limit bounds before compilation.
    fn validate_query(&self, raw_query: &str, limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(ScriptureError::InvalidSearchQuery {
                query: raw_query.to_string(),
                reason: "result limit must be greater than zero".to_string(),
            });
        }

        let length = raw_query.trim().len();
        if length > 0 && length < self.config.search.min_query_length {
            return Err(ScriptureError::InvalidSearchQuery {
                query: raw_query.to_string(),
                reason: format!(
                    "Query too short: minimum {} characters",
                    self.config.search.min_query_length
                ),
            });
        }
        if length > self.config.search.max_query_length {
            return Err(ScriptureError::InvalidSearchQuery {
                query: raw_query.to_string(),
                reason: format!(
                    "Query too long: maximum {} characters",
                    self.config.search.max_query_length
                ),
            });
        }
        Ok(())
    }

    fn format_verse_data(
        &self,
        reference: &Reference,
        translation: &str,
        verses: Vec<VerseText>,
        book: &Book,
    ) -> VerseData {
        let (passage_type, text) = if verses.len() == 1 {
            (PassageType::SingleVerse, verses[0].text.clone())
        } else {
            let combined = verses
                .iter()
                .map(|v| format!("[{}] {}", v.verse, v.text))
                .collect::<Vec<_>>()
                .join(" ");
            (PassageType::VerseRange, combined)
        };

        VerseData {
            reference: reference.display(&self.canon),
            translation: translation.to_string(),
            passage_type,
            chapter: reference.chapter,
            verse_count: verses.len(),
            text,
            verses,
            book: BookInfo::from_book(book),
        }
    }
}

/// Translate the compiled query tree into the index's native expression.
fn translate(node: &QueryNode) -> MatchExpr {
    match node {
        QueryNode::Term(term) => {
            let mut tokens = crate::index::tokenize(term);
            match tokens.len() {
                // A term the tokenizer rejects entirely can never match.
                0 => MatchExpr::Token(term.to_lowercase()),
                1 => MatchExpr::Token(tokens.remove(0)),
                // Hyphenated terms split into a conjunction of tokens.
                _ => MatchExpr::All(tokens.into_iter().map(MatchExpr::Token).collect()),
            }
        }
        QueryNode::Phrase(phrase) => MatchExpr::Contiguous(phrase.clone()),
        QueryNode::And(children) => MatchExpr::All(children.iter().map(translate).collect()),
        QueryNode::Or(children) => MatchExpr::Any(children.iter().map(translate).collect()),
        QueryNode::Not(child) => MatchExpr::Exclude(Box::new(translate(child))),
    }
}
