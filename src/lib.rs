//! # Scripture Search Engine
//!
//! ## Overview
//! This library implements a verse lookup and full-text search engine over
//! the 66-book Protestant canon, combining a validated reference resolver
//! with a boolean/phrase query engine.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `canon`: Immutable catalog of books, aliases, and versification
//! - `reference`: Citation parsing and bounds validation
//! - `query`: Search string compilation into a boolean/phrase query tree
//! - `index`: Full-text index with the MATCH-and-rank primitive
//! - `search`: Search execution, ordering contract, and verse lookup
//! - `aggregate`: Summary statistics over result sets
//! - `storage`: Persistent verse store
//! - `api`: REST API endpoints
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Citation strings ("John 3:16"), search queries (text)
//! - **Output**: Validated verse data, ranked search results with metadata
//! - **Determinism**: Equal-score results always order by canonical book,
//!   chapter, verse
//!
//! ## Usage
//! ```rust,no_run
//! use scripture_search::canon::Canon;
//! use scripture_search::reference::Resolver;
//! use std::sync::Arc;
//!
//! let canon = Arc::new(Canon::standard().unwrap());
//! let resolver = Resolver::new(canon);
//! let reference = resolver.resolve("John 3:16", "KJV").unwrap();
//! assert_eq!(reference.book_id, "JHN");
//! ```

// Core modules
pub mod aggregate;
pub mod api;
pub mod canon;
pub mod config;
pub mod errors;
pub mod index;
pub mod query;
pub mod reference;
pub mod search;
pub mod storage;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use canon::{Book, Canon, Testament};
pub use config::Config;
pub use errors::{Result, ScriptureError};
pub use query::{QueryNode, SearchQuery};
pub use reference::{Reference, Resolver};
pub use search::{SearchEngine, SearchOutcome, SearchResult, VerseData};

use std::sync::Arc;

/// Application state shared across components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub canon: Arc<canon::Canon>,
    pub engine: Arc<search::SearchEngine>,
    pub storage: Arc<storage::VerseStorage>,
    pub index: Arc<index::InvertedIndex>,
}
