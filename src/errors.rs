//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the scripture search engine, providing
//! typed error variants for reference resolution, query compilation, search
//! execution, and the surrounding infrastructure.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from all system components
//! - **Output**: Structured error types with context, categories, and
//!   caller-facing guidance
//! - **Error Categories**: Reference, Query, Search, Storage, Configuration
//!
//! ## Key Features
//! - Every caller-facing variant carries a recovery suggestion and at least
//!   one valid-format example string
//! - Out-of-range errors carry the valid bound, never a clamped value
//! - Nothing in this taxonomy is fatal to the process; a malformed request
//!   never affects any other concurrent request

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, ScriptureError>;

/// Error types for the scripture search engine
#[derive(Debug, Error)]
pub enum ScriptureError {
    // Reference resolution errors
    #[error("Unknown book: '{token}'")]
    UnknownBook {
        token: String,
        /// Up to a few display names that look similar, for messaging.
        suggestions: Vec<String>,
    },

    #[error("Malformed reference '{input}': {details}")]
    MalformedReference { input: String, details: String },

    #[error("Invalid verse range: end verse {end} is before start verse {start}")]
    InvalidRange { start: u32, end: u32 },

    #[error("{book} has {max_chapters} chapters, not {chapter}")]
    ChapterOutOfRange {
        book: String,
        chapter: u32,
        max_chapters: u32,
    },

    #[error("{book} {chapter} has {max_verses} verses, not {verse}")]
    VerseOutOfRange {
        book: String,
        chapter: u32,
        verse: u32,
        max_verses: u32,
    },

    // Verse store errors
    #[error("Translation '{translation}' is not available")]
    TranslationNotFound {
        translation: String,
        available: Vec<String>,
    },

    #[error("No text found for {reference} in {translation}")]
    VerseNotFound {
        reference: String,
        translation: String,
    },

    // Query compilation errors
    #[error("Malformed search query '{query}': {reason}")]
    MalformedQuery { query: String, reason: String },

    #[error("Invalid search query: {query} - {reason}")]
    InvalidSearchQuery { query: String, reason: String },

    // Search execution errors
    #[error("Search timeout: query took longer than {timeout_ms}ms")]
    SearchTimeout { timeout_ms: u64 },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    // Storage errors
    #[error("Database connection failed: {db_path} - {reason}")]
    DatabaseConnectionFailed { db_path: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScriptureError {
    /// Check if the error is recoverable (the caller can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScriptureError::SearchTimeout { .. }
                | ScriptureError::DatabaseConnectionFailed { .. }
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            ScriptureError::UnknownBook { .. }
            | ScriptureError::MalformedReference { .. }
            | ScriptureError::InvalidRange { .. }
            | ScriptureError::ChapterOutOfRange { .. }
            | ScriptureError::VerseOutOfRange { .. } => "reference",
            ScriptureError::TranslationNotFound { .. }
            | ScriptureError::VerseNotFound { .. } => "verse_store",
            ScriptureError::MalformedQuery { .. }
            | ScriptureError::InvalidSearchQuery { .. } => "query",
            ScriptureError::SearchTimeout { .. } => "search",
            ScriptureError::Config { .. } | ScriptureError::ValidationFailed { .. } => {
                "configuration"
            }
            ScriptureError::DatabaseConnectionFailed { .. }
            | ScriptureError::Database(_)
            | ScriptureError::Serialization(_) => "storage",
            ScriptureError::Json(_)
            | ScriptureError::Toml(_)
            | ScriptureError::Io(_)
            | ScriptureError::Internal { .. } => "system",
        }
    }

    /// Caller-facing recovery guidance
    pub fn suggestion(&self) -> String {
        match self {
            ScriptureError::UnknownBook { suggestions, .. } => {
                if suggestions.is_empty() {
                    "Check the book name spelling or use a standard abbreviation".to_string()
                } else {
                    format!("Did you mean: {}?", suggestions.join(", "))
                }
            }
            ScriptureError::MalformedReference { .. } => {
                "Use the format 'Book Chapter:Verse' or 'Book Chapter:Start-End'".to_string()
            }
            ScriptureError::InvalidRange { .. } => {
                "The end verse must not be before the start verse".to_string()
            }
            ScriptureError::ChapterOutOfRange { book, max_chapters, .. } => {
                format!("Choose a chapter between 1 and {} for {}", max_chapters, book)
            }
            ScriptureError::VerseOutOfRange {
                book,
                chapter,
                max_verses,
                ..
            } => format!(
                "Choose a verse between 1 and {} for {} {}",
                max_verses, book, chapter
            ),
            ScriptureError::TranslationNotFound { available, .. } => {
                if available.is_empty() {
                    "No translations are loaded; load verse data first".to_string()
                } else {
                    format!("Try one of: {}", available.join(", "))
                }
            }
            ScriptureError::VerseNotFound { translation, .. } => format!(
                "The reference is valid but has no text in {}; try another translation",
                translation
            ),
            ScriptureError::MalformedQuery { .. } => {
                "Provide at least one search term; quote phrases and use AND, OR, NOT".to_string()
            }
            ScriptureError::InvalidSearchQuery { .. } => {
                "Adjust the query length and try again".to_string()
            }
            ScriptureError::SearchTimeout { .. } => {
                "Simplify the query or increase the search timeout".to_string()
            }
            _ => "See the server logs for details".to_string(),
        }
    }

    /// A valid-format example string for caller-facing errors, so a UI or
    /// AI caller can relay actionable guidance.
    pub fn example(&self) -> Option<&'static str> {
        match self {
            ScriptureError::UnknownBook { .. }
            | ScriptureError::MalformedReference { .. }
            | ScriptureError::ChapterOutOfRange { .. }
            | ScriptureError::VerseOutOfRange { .. }
            | ScriptureError::VerseNotFound { .. } => Some("John 3:16"),
            ScriptureError::InvalidRange { .. } => Some("Romans 8:28-30"),
            ScriptureError::TranslationNotFound { .. } => Some("KJV"),
            ScriptureError::MalformedQuery { .. }
            | ScriptureError::InvalidSearchQuery { .. }
            | ScriptureError::SearchTimeout { .. } => Some("\"love your enemies\" AND faith"),
            _ => None,
        }
    }
}

/// Helper macro for internal error construction
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::errors::ScriptureError::Internal {
            message: $msg.to_string(),
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::ScriptureError::Internal {
            message: format!($fmt, $($arg)*),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_carries_bound() {
        let err = ScriptureError::ChapterOutOfRange {
            book: "John".to_string(),
            chapter: 40,
            max_chapters: 21,
        };
        assert_eq!(err.to_string(), "John has 21 chapters, not 40");
        assert!(err.suggestion().contains("between 1 and 21"));
        assert_eq!(err.category(), "reference");
    }

    #[test]
    fn test_caller_facing_errors_have_examples() {
        let errs: Vec<ScriptureError> = vec![
            ScriptureError::UnknownBook {
                token: "jhonn".to_string(),
                suggestions: vec![],
            },
            ScriptureError::MalformedReference {
                input: "John 3:16:17".to_string(),
                details: "trailing text".to_string(),
            },
            ScriptureError::InvalidRange { start: 20, end: 10 },
            ScriptureError::TranslationNotFound {
                translation: "XYZ".to_string(),
                available: vec!["KJV".to_string()],
            },
            ScriptureError::MalformedQuery {
                query: String::new(),
                reason: "blank".to_string(),
            },
            ScriptureError::SearchTimeout { timeout_ms: 5000 },
        ];
        for err in errs {
            assert!(err.example().is_some(), "missing example for {}", err);
        }
    }

    #[test]
    fn test_unknown_book_suggestions() {
        let err = ScriptureError::UnknownBook {
            token: "corinthian".to_string(),
            suggestions: vec!["1 Corinthians".to_string(), "2 Corinthians".to_string()],
        };
        assert!(err.suggestion().starts_with("Did you mean"));
    }

    #[test]
    fn test_recoverability() {
        assert!(ScriptureError::SearchTimeout { timeout_ms: 100 }.is_recoverable());
        assert!(!ScriptureError::InvalidRange { start: 5, end: 1 }.is_recoverable());
    }
}
