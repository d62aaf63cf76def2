//! # Result Aggregation Module
//!
//! ## Purpose
//! Pure summary statistics over a search result set: testament distribution
//! and the distinct books hit, in first-seen order.
//!
//! ## Input/Output Specification
//! - **Input**: Ordered search results
//! - **Output**: `SearchSummary` with zeroed counts for empty input
//! - **Purity**: No I/O, no failure modes

use crate::search::SearchResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics over one result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    pub total_results: usize,
    /// Testament code -> hit count; both "OT" and "NT" are always present.
    pub testament_distribution: BTreeMap<String, usize>,
    /// Distinct book names in first-seen (result) order.
    pub books_found: Vec<String>,
    /// Genre -> hit count over the result set.
    pub genre_distribution: BTreeMap<String, usize>,
}

/// Compute summary statistics for a result set.
pub fn aggregate(results: &[SearchResult]) -> SearchSummary {
    let mut testament_distribution = BTreeMap::new();
    testament_distribution.insert("OT".to_string(), 0);
    testament_distribution.insert("NT".to_string(), 0);

    let mut genre_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut books_found: Vec<String> = Vec::new();

    for result in results {
        *testament_distribution
            .entry(result.book.testament.clone())
            .or_insert(0) += 1;
        *genre_distribution
            .entry(result.book.genre.clone())
            .or_insert(0) += 1;
        if !books_found.iter().any(|name| name == &result.book.name) {
            books_found.push(result.book.name.clone());
        }
    }

    SearchSummary {
        total_results: results.len(),
        testament_distribution,
        books_found,
        genre_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::BookInfo;

    fn result(book_id: &str, name: &str, testament: &str, genre: &str, order: u32) -> SearchResult {
        SearchResult {
            reference: format!("{} 1:1", name),
            book_id: book_id.to_string(),
            chapter: 1,
            verse: 1,
            text: "text".to_string(),
            snippet: "text".to_string(),
            relevance_score: 1.0,
            book: BookInfo {
                id: book_id.to_string(),
                name: name.to_string(),
                testament: testament.to_string(),
                author: "author".to_string(),
                genre: genre.to_string(),
                canonical_order: order,
            },
        }
    }

    #[test]
    fn test_empty_input_yields_zero_counts() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total_results, 0);
        assert_eq!(summary.testament_distribution["OT"], 0);
        assert_eq!(summary.testament_distribution["NT"], 0);
        assert!(summary.books_found.is_empty());
        assert!(summary.genre_distribution.is_empty());
    }

    #[test]
    fn test_distribution_counts() {
        let results = vec![
            result("JHN", "John", "NT", "Gospel", 43),
            result("GEN", "Genesis", "OT", "Law", 1),
            result("JHN", "John", "NT", "Gospel", 43),
            result("ROM", "Romans", "NT", "Epistle", 45),
        ];
        let summary = aggregate(&results);
        assert_eq!(summary.total_results, 4);
        assert_eq!(summary.testament_distribution["NT"], 3);
        assert_eq!(summary.testament_distribution["OT"], 1);
        assert_eq!(summary.genre_distribution["Gospel"], 2);
        assert_eq!(summary.genre_distribution["Epistle"], 1);
    }

    #[test]
    fn test_books_found_first_seen_order() {
        let results = vec![
            result("ROM", "Romans", "NT", "Epistle", 45),
            result("GEN", "Genesis", "OT", "Law", 1),
            result("ROM", "Romans", "NT", "Epistle", 45),
            result("JHN", "John", "NT", "Gospel", 43),
        ];
        let summary = aggregate(&results);
        assert_eq!(summary.books_found, vec!["Romans", "Genesis", "John"]);
    }
}
