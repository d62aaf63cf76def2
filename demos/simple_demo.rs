//! Simple demonstration of the scripture search engine
//!
//! Loads a handful of verses into a throwaway database, then runs a lookup
//! and a few searches against them.

use anyhow::Result;
use scripture_search::{
    canon::Canon,
    config::Config,
    index::InvertedIndex,
    search::SearchEngine,
    storage::{TranslationRecord, VerseStorage},
};
use std::sync::Arc;

const SAMPLE_VERSES: &[(&str, u32, u32, &str)] = &[
    ("GEN", 1, 1, "In the beginning God created the heaven and the earth."),
    ("PSA", 23, 1, "The LORD is my shepherd; I shall not want."),
    ("JHN", 3, 16, "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life."),
    ("JHN", 11, 35, "Jesus wept."),
    ("MAT", 5, 44, "But I say unto you, Love your enemies, bless them that curse you, do good to them that hate you;"),
    ("1JN", 4, 8, "He that loveth not knoweth not God; for God is love."),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("Scripture Search Engine - Simple Demo");
    println!("=====================================");

    let temp_dir = tempfile::tempdir()?;
    let mut config = Config::default();
    config.storage.db_path = temp_dir.path().join("demo.db");
    let config = Arc::new(config);

    println!("Building canon catalog...");
    let canon = Arc::new(Canon::standard()?);

    println!("Loading {} sample verses...", SAMPLE_VERSES.len());
    let storage = Arc::new(VerseStorage::new(config.storage.clone()).await?);
    storage
        .register_translation(&TranslationRecord {
            id: "KJV".to_string(),
            name: "King James Version".to_string(),
            language: "en".to_string(),
        })
        .await?;
    for (book, chapter, verse, text) in SAMPLE_VERSES {
        storage.load_verse("KJV", book, *chapter, *verse, text).await?;
    }
    storage.finish_load().await?;

    println!("Building text index...");
    let index = Arc::new(InvertedIndex::new(config.index.clone()));
    let entries = storage.scan_translation("KJV").await?;
    index.build_translation("KJV", &entries);

    let engine = SearchEngine::new(config, canon, storage, index);

    println!();
    println!("Lookup: John 3:16");
    let verse = engine.lookup("John 3:16", Some("KJV")).await?;
    println!("  {} - {}", verse.reference, verse.text);

    for query in ["god love", "\"love your enemies\"", "god AND NOT love"] {
        println!();
        println!("Search: {}", query);
        let outcome = engine.search(query, Some("KJV"), Some(5)).await?;
        for result in &outcome.results {
            println!(
                "  [{:.3}] {} - {}",
                result.relevance_score, result.reference, result.snippet
            );
        }
        println!(
            "  {} results across {:?} ({:?})",
            outcome.summary.total_results,
            outcome.summary.books_found,
            outcome.summary.testament_distribution
        );
    }

    Ok(())
}
