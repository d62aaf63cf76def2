//! # Reference Resolver Module
//!
//! ## Purpose
//! Parses free-form citation strings ("John 3:16", "Gen 1:1",
//! "Romans 8:28-30", "1 Cor 13") into validated, bounds-checked references
//! against the canon catalog.
//!
//! ## Input/Output Specification
//! - **Input**: Citation string in any supported naming convention, plus a
//!   translation code passed through uninterpreted
//! - **Output**: A `Reference` covering one verse or a same-chapter verse
//!   range, or a typed resolution error
//! - **Boundary policy**: A reference never crosses a chapter boundary; a
//!   range stops at the end of the cited chapter unless the chapter is
//!   re-specified in a new citation
//!
//! ## Key Features
//! - Greedy-longest book token matching over an exact alias table, so "jo"
//!   never shadows "john" vs "joel"
//! - Numeric-prefixed books in all common forms ("1 John", "1John", "I John")
//! - Bare chapter citations expand to the whole chapter
//! - Out-of-range chapters and verses are rejected with the valid bound,
//!   never silently clamped

use crate::canon::{normalize_alias, Book, Canon};
use crate::errors::{Result, ScriptureError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A resolved, bounds-validated pointer to one verse or a same-chapter
/// verse range. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Stable book code, e.g. "JHN"
    pub book_id: String,
    /// 1-indexed chapter
    pub chapter: u32,
    /// First verse of the range
    pub verse_start: u32,
    /// Last verse of the range; equals `verse_start` for a single verse
    pub verse_end: u32,
    /// Translation code, uninterpreted by the resolver
    pub translation: String,
}

impl Reference {
    /// Whether this reference points at exactly one verse.
    pub fn is_single(&self) -> bool {
        self.verse_start == self.verse_end
    }

    /// Number of verses covered, always >= 1.
    pub fn verse_count(&self) -> u32 {
        self.verse_end - self.verse_start + 1
    }

    /// The covered verse numbers in order, contiguous and without gaps.
    pub fn verses(&self) -> impl Iterator<Item = u32> {
        self.verse_start..=self.verse_end
    }

    /// Display form using the catalog's book name, e.g. "John 3:16" or
    /// "Romans 8:28-30".
    pub fn display(&self, canon: &Canon) -> String {
        let name = canon
            .book(&self.book_id)
            .map(|b| b.name)
            .unwrap_or(self.book_id.as_str());
        if self.is_single() {
            format!("{} {}:{}", name, self.chapter, self.verse_start)
        } else {
            format!(
                "{} {}:{}-{}",
                name, self.chapter, self.verse_start, self.verse_end
            )
        }
    }
}

/// Resolves citation strings against the immutable canon catalog.
///
/// Pure and CPU-bound: safe to call from any number of concurrent tasks.
pub struct Resolver {
    canon: Arc<Canon>,
    locator_re: Regex,
}

impl Resolver {
    /// Create a resolver over the given catalog.
    pub fn new(canon: Arc<Canon>) -> Self {
        // chapter (":" verse ("-" verse)?)? - anything else is malformed.
        let locator_re = Regex::new(r"^(\d+)(?::(\d+)(?:-(\d+))?)?$")
            .expect("locator grammar regex is valid");
        Self { canon, locator_re }
    }

    /// Resolve a citation string into a validated [`Reference`].
    ///
    /// The translation code is passed through uninterpreted; whether it
    /// exists is the verse store's concern.
    pub fn resolve(&self, raw: &str, translation: &str) -> Result<Reference> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScriptureError::MalformedReference {
                input: raw.to_string(),
                details: "empty reference".to_string(),
            });
        }

        // Normalize: lowercase, punctuation to whitespace, collapsed.
        let cleaned: String = trimmed
            .to_lowercase()
            .chars()
            .map(|c| if c == '.' || c == ',' { ' ' } else { c })
            .collect();
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();

        // Greedy-longest book token: the longest leading token run with an
        // exact alias match wins; the remainder is the locator.
        for split in (1..tokens.len()).rev() {
            let candidate = tokens[..split].join(" ");
            if let Some(book) = self.canon.resolve_alias(&normalize_alias(&candidate)) {
                let locator = tokens[split..].concat();
                return self.parse_locator(trimmed, book, &locator, translation);
            }
        }

        // No split worked. A full-string alias match means the locator is
        // missing; anything else is an unknown book.
        if self
            .canon
            .resolve_alias(&normalize_alias(&tokens.join(" ")))
            .is_some()
        {
            return Err(ScriptureError::MalformedReference {
                input: raw.to_string(),
                details: "missing chapter number".to_string(),
            });
        }

        let token = self.book_portion(&tokens);
        let suggestions = self
            .canon
            .similar_books(&token, 3)
            .into_iter()
            .map(String::from)
            .collect();
        Err(ScriptureError::UnknownBook { token, suggestions })
    }

    /// Parse and bounds-check the locator against the resolved book.
    fn parse_locator(
        &self,
        raw: &str,
        book: &Book,
        locator: &str,
        translation: &str,
    ) -> Result<Reference> {
        let caps = self.locator_re.captures(locator).ok_or_else(|| {
            ScriptureError::MalformedReference {
                input: raw.to_string(),
                details: format!("cannot parse chapter and verse from '{}'", locator),
            }
        })?;

        let chapter = parse_number(raw, caps.get(1).map(|m| m.as_str()).unwrap_or_default())?;
        let max_verse = book.verses_in_chapter(chapter).ok_or_else(|| {
            ScriptureError::ChapterOutOfRange {
                book: book.name.to_string(),
                chapter,
                max_chapters: book.chapter_count(),
            }
        })? as u32;

        let (verse_start, verse_end) = match caps.get(2) {
            // Bare chapter: the whole chapter.
            None => (1, max_verse),
            Some(start) => {
                let verse_start = parse_number(raw, start.as_str())?;
                let verse_end = match caps.get(3) {
                    None => verse_start,
                    Some(end) => parse_number(raw, end.as_str())?,
                };
                if verse_end < verse_start {
                    return Err(ScriptureError::InvalidRange {
                        start: verse_start,
                        end: verse_end,
                    });
                }
                (verse_start, verse_end)
            }
        };

        for verse in [verse_start, verse_end] {
            if verse < 1 || verse > max_verse {
                return Err(ScriptureError::VerseOutOfRange {
                    book: book.name.to_string(),
                    chapter,
                    verse,
                    max_verses: max_verse,
                });
            }
        }

        Ok(Reference {
            book_id: book.id.to_string(),
            chapter,
            verse_start,
            verse_end,
            translation: translation.to_string(),
        })
    }

    /// The book-ish leading portion of an unresolvable citation, with any
    /// trailing locator-looking tokens stripped, for error messaging.
    fn book_portion(&self, tokens: &[&str]) -> String {
        let mut end = tokens.len();
        while end > 1 && tokens[end - 1].chars().next().is_some_and(|c| c.is_ascii_digit()) {
            end -= 1;
        }
        tokens[..end].join(" ")
    }
}

fn parse_number(raw: &str, digits: &str) -> Result<u32> {
    digits
        .parse::<u32>()
        .map_err(|_| ScriptureError::MalformedReference {
            input: raw.to_string(),
            details: format!("number '{}' is out of range", digits),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(Canon::standard().unwrap()))
    }

    #[test]
    fn test_resolve_single_verse() {
        let reference = resolver().resolve("John 3:16", "KJV").unwrap();
        assert_eq!(reference.book_id, "JHN");
        assert_eq!(reference.chapter, 3);
        assert_eq!(reference.verse_start, 16);
        assert_eq!(reference.verse_end, 16);
        assert_eq!(reference.translation, "KJV");
        assert!(reference.is_single());
    }

    #[test]
    fn test_resolve_verse_range() {
        let reference = resolver().resolve("Romans 8:28-30", "KJV").unwrap();
        assert_eq!(reference.book_id, "ROM");
        assert_eq!(reference.chapter, 8);
        assert_eq!(reference.verse_start, 28);
        assert_eq!(reference.verse_end, 30);
        assert_eq!(reference.verse_count(), 3);
        let verses: Vec<u32> = reference.verses().collect();
        assert_eq!(verses, vec![28, 29, 30]);
    }

    #[test]
    fn test_resolve_whole_chapter() {
        let reference = resolver().resolve("1 Cor 13", "KJV").unwrap();
        assert_eq!(reference.book_id, "1CO");
        assert_eq!(reference.chapter, 13);
        assert_eq!(reference.verse_start, 1);
        assert_eq!(reference.verse_end, 13);
    }

    #[test]
    fn test_numeric_prefix_forms_agree() {
        let r = resolver();
        let spaced = r.resolve("1 Cor 13:4", "KJV").unwrap();
        let compact = r.resolve("1Cor 13:4", "KJV").unwrap();
        let roman = r.resolve("I Corinthians 13:4", "KJV").unwrap();
        assert_eq!(spaced, compact);
        assert_eq!(spaced, roman);
        assert_eq!(spaced.book_id, "1CO");
    }

    #[test]
    fn test_verse_out_of_range_cites_bound() {
        match resolver().resolve("John 3:99", "KJV") {
            Err(ScriptureError::VerseOutOfRange {
                book,
                chapter,
                verse,
                max_verses,
            }) => {
                assert_eq!(book, "John");
                assert_eq!(chapter, 3);
                assert_eq!(verse, 99);
                assert_eq!(max_verses, 36);
            }
            other => panic!("expected VerseOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_chapter_out_of_range_cites_bound() {
        match resolver().resolve("John 22:1", "KJV") {
            Err(ScriptureError::ChapterOutOfRange {
                book, max_chapters, ..
            }) => {
                assert_eq!(book, "John");
                assert_eq!(max_chapters, 21);
            }
            other => panic!("expected ChapterOutOfRange, got {:?}", other),
        }
        assert!(matches!(
            resolver().resolve("John 0:1", "KJV"),
            Err(ScriptureError::ChapterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_inverted_range_is_invalid() {
        assert!(matches!(
            resolver().resolve("Romans 8:30-28", "KJV"),
            Err(ScriptureError::InvalidRange { start: 30, end: 28 })
        ));
    }

    #[test]
    fn test_malformed_references() {
        let r = resolver();
        for input in ["John 3:16:17", "John 3:16 extra", "John", "", "   "] {
            assert!(
                matches!(
                    r.resolve(input, "KJV"),
                    Err(ScriptureError::MalformedReference { .. })
                ),
                "expected MalformedReference for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_unknown_book_carries_token() {
        match resolver().resolve("Jonn 3:16", "KJV") {
            Err(ScriptureError::UnknownBook { token, .. }) => assert_eq!(token, "jonn"),
            other => panic!("expected UnknownBook, got {:?}", other),
        }
        // An exact-match table never lets a bare prefix through.
        assert!(matches!(
            resolver().resolve("jo 3:16", "KJV"),
            Err(ScriptureError::UnknownBook { .. })
        ));
    }

    #[test]
    fn test_single_chapter_book() {
        let reference = resolver().resolve("Obadiah 1:21", "KJV").unwrap();
        assert_eq!(reference.book_id, "OBA");
        assert_eq!(reference.verse_start, 21);

        let jude = resolver().resolve("Jude 1", "KJV").unwrap();
        assert_eq!(jude.book_id, "JUD");
        assert_eq!(jude.verse_end, 25);
    }

    #[test]
    fn test_multiword_book_names() {
        let reference = resolver().resolve("Song of Solomon 2:1", "KJV").unwrap();
        assert_eq!(reference.book_id, "SNG");
        assert_eq!(reference.chapter, 2);
    }

    #[test]
    fn test_display_round_trip() {
        let canon = Arc::new(Canon::standard().unwrap());
        let r = Resolver::new(canon.clone());

        let single = r.resolve("John 3:16", "KJV").unwrap();
        assert_eq!(single.display(&canon), "John 3:16");

        let range = r.resolve("Romans 8:28-30", "KJV").unwrap();
        assert_eq!(range.display(&canon), "Romans 8:28-30");

        // The display form resolves back to the same reference.
        let again = r.resolve(&range.display(&canon), "KJV").unwrap();
        assert_eq!(again, range);
    }

    #[test]
    fn test_round_trip_across_canon() {
        let canon = Arc::new(Canon::standard().unwrap());
        let r = Resolver::new(canon.clone());
        for book in canon.books() {
            let last_chapter = book.chapter_count();
            let last_verse = book.verses_in_chapter(last_chapter).unwrap() as u32;
            let citation = format!("{} {}:{}", book.name, last_chapter, last_verse);
            let reference = r
                .resolve(&citation, "KJV")
                .unwrap_or_else(|e| panic!("{} failed: {}", citation, e));
            assert_eq!(reference.book_id, book.id);
            assert_eq!(reference.chapter, last_chapter);
            assert_eq!(reference.verse_start, last_verse);
        }
    }
}
