//! # Verse Storage Module
//!
//! ## Purpose
//! Read-only verse store consumed by the lookup and search paths: given
//! `(translation, book, chapter, verse)` it returns verse text or nothing.
//! The bundled implementation persists verses in an embedded sled database;
//! anything satisfying [`VerseStore`] can stand in for it.
//!
//! ## Input/Output Specification
//! - **Input**: Verse coordinates, translation codes
//! - **Output**: Verse text, translation availability, storage statistics
//! - **Storage**: Sled embedded database, one tree for verses and one for
//!   translation metadata
//!
//! ## Key Features
//! - Case-insensitive translation and book codes in the key encoding
//! - Optional gzip compression of stored verse text
//! - Loader API for the out-of-scope ingestion path and for tests
//! - Health check exercising a write/read/delete cycle

use crate::config::StorageConfig;
use crate::errors::{Result, ScriptureError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Read-only contract the engine consumes. The storage engine behind it is
/// an external collaborator; only this surface is relied upon.
#[async_trait]
pub trait VerseStore: Send + Sync {
    /// Fetch the text of one verse, or `None` if the store has no text for
    /// it in the given translation.
    async fn fetch(
        &self,
        translation: &str,
        book_id: &str,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>>;

    /// Whether the translation is known to the store.
    async fn has_translation(&self, translation: &str) -> Result<bool>;

    /// Translation codes available in the store, sorted.
    async fn translations(&self) -> Result<Vec<String>>;
}

/// A translation known to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Short code, e.g. "KJV"
    pub id: String,
    /// Full name, e.g. "King James Version"
    pub name: String,
    /// ISO language code, e.g. "en"
    pub language: String,
}

/// One verse as scanned out of the store, used by the index builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseEntry {
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

/// Storage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_verses: usize,
    pub translations: Vec<String>,
    pub database_size_bytes: u64,
    pub last_loaded: Option<chrono::DateTime<chrono::Utc>>,
}

/// Sled-backed verse store.
pub struct VerseStorage {
    config: StorageConfig,
    db: Arc<sled::Db>,
    verse_tree: Arc<sled::Tree>,
    translation_tree: Arc<sled::Tree>,
    stats: Arc<RwLock<StorageStats>>,
}

impl VerseStorage {
    /// Open (or create) the verse database at the configured path.
    pub async fn new(config: StorageConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db = sled::open(&config.db_path).map_err(|e| {
            ScriptureError::DatabaseConnectionFailed {
                db_path: config.db_path.to_string_lossy().to_string(),
                reason: e.to_string(),
            }
        })?;

        let verse_tree = db.open_tree("verses").map_err(|e| {
            ScriptureError::DatabaseConnectionFailed {
                db_path: config.db_path.to_string_lossy().to_string(),
                reason: format!("Failed to open verse tree: {}", e),
            }
        })?;

        let translation_tree = db.open_tree("translations").map_err(|e| {
            ScriptureError::DatabaseConnectionFailed {
                db_path: config.db_path.to_string_lossy().to_string(),
                reason: format!("Failed to open translation tree: {}", e),
            }
        })?;

        let stats = Arc::new(RwLock::new(StorageStats {
            total_verses: verse_tree.len(),
            translations: Vec::new(),
            database_size_bytes: 0,
            last_loaded: None,
        }));

        let storage = Self {
            config,
            db: Arc::new(db),
            verse_tree: Arc::new(verse_tree),
            translation_tree: Arc::new(translation_tree),
            stats,
        };
        storage.update_stats().await?;

        tracing::info!(
            "Verse storage opened with {} verses",
            storage.stats.read().await.total_verses
        );
        Ok(storage)
    }

    /// Register a translation so it shows up in availability checks.
    pub async fn register_translation(&self, record: &TranslationRecord) -> Result<()> {
        let key = record.id.to_uppercase();
        let value = bincode::serialize(record)?;
        self.translation_tree.insert(key.as_bytes(), value)?;
        self.update_stats().await?;
        tracing::debug!("Registered translation {}", record.id);
        Ok(())
    }

    /// Store the text of one verse. Loader-side API: the exposed lookup and
    /// search operations never write.
    pub async fn load_verse(
        &self,
        translation: &str,
        book_id: &str,
        chapter: u32,
        verse: u32,
        text: &str,
    ) -> Result<()> {
        let key = verse_key(translation, book_id, chapter, verse);
        let data = if self.config.enable_compression {
            compress_text(text)?
        } else {
            text.as_bytes().to_vec()
        };
        self.verse_tree.insert(key.as_bytes(), data)?;
        Ok(())
    }

    /// Flush pending writes and refresh statistics after a bulk load.
    pub async fn finish_load(&self) -> Result<()> {
        self.db
            .flush_async()
            .await
            .map_err(|e| crate::internal_error!("Failed to flush database: {}", e))?;
        {
            let mut stats = self.stats.write().await;
            stats.last_loaded = Some(chrono::Utc::now());
        }
        self.update_stats().await
    }

    /// All verses of one translation, for the index builder.
    pub async fn scan_translation(&self, translation: &str) -> Result<Vec<VerseEntry>> {
        let prefix = format!("{}/", translation.to_uppercase());
        let mut entries = Vec::new();

        for item in self.verse_tree.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            let key_str = String::from_utf8(key.to_vec()).map_err(|e| {
                ScriptureError::Internal {
                    message: format!("non-UTF8 verse key: {}", e),
                }
            })?;
            let (book_id, chapter, verse) = decode_verse_key(&key_str)?;
            entries.push(VerseEntry {
                book_id,
                chapter,
                verse,
                text: self.decode_text(&value)?,
            });
        }

        Ok(entries)
    }

    fn decode_text(&self, data: &[u8]) -> Result<String> {
        if self.config.enable_compression {
            decompress_text(data)
        } else {
            String::from_utf8(data.to_vec()).map_err(|e| ScriptureError::Internal {
                message: format!("non-UTF8 verse text: {}", e),
            })
        }
    }

    /// Update storage statistics
    async fn update_stats(&self) -> Result<()> {
        let mut translations: Vec<String> = self
            .translation_tree
            .iter()
            .keys()
            .filter_map(|k| k.ok())
            .filter_map(|k| String::from_utf8(k.to_vec()).ok())
            .collect();
        translations.sort();

        let mut stats = self.stats.write().await;
        stats.total_verses = self.verse_tree.len();
        stats.translations = translations;
        stats.database_size_bytes = self
            .db
            .size_on_disk()
            .map_err(|e| crate::internal_error!("Failed to get database size: {}", e))?;
        Ok(())
    }

    /// Get storage statistics
    pub async fn get_stats(&self) -> Result<StorageStats> {
        self.update_stats().await?;
        Ok(self.stats.read().await.clone())
    }

    /// Health check exercising a full write/read/delete cycle.
    pub async fn health_check(&self) -> Result<()> {
        let test_key = b"health_check";
        let test_value = b"ok";

        self.translation_tree.insert(test_key, test_value).map_err(|e| {
            ScriptureError::DatabaseConnectionFailed {
                db_path: self.config.db_path.to_string_lossy().to_string(),
                reason: format!("Health check write failed: {}", e),
            }
        })?;

        let result = self.translation_tree.get(test_key).map_err(|e| {
            ScriptureError::DatabaseConnectionFailed {
                db_path: self.config.db_path.to_string_lossy().to_string(),
                reason: format!("Health check read failed: {}", e),
            }
        })?;
        if result.is_none() {
            return Err(ScriptureError::DatabaseConnectionFailed {
                db_path: self.config.db_path.to_string_lossy().to_string(),
                reason: "Health check value not found".to_string(),
            });
        }

        self.translation_tree.remove(test_key)?;
        Ok(())
    }
}

#[async_trait]
impl VerseStore for VerseStorage {
    async fn fetch(
        &self,
        translation: &str,
        book_id: &str,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<String>> {
        let key = verse_key(translation, book_id, chapter, verse);
        match self.verse_tree.get(key.as_bytes())? {
            Some(data) => Ok(Some(self.decode_text(&data)?)),
            None => Ok(None),
        }
    }

    async fn has_translation(&self, translation: &str) -> Result<bool> {
        let key = translation.to_uppercase();
        Ok(self.translation_tree.contains_key(key.as_bytes())?)
    }

    async fn translations(&self) -> Result<Vec<String>> {
        Ok(self.get_stats().await?.translations)
    }
}

/// Key layout: `TRANSLATION/BOOK/chapter/verse` with zero-padded numbers so
/// lexicographic order matches verse order within a chapter.
fn verse_key(translation: &str, book_id: &str, chapter: u32, verse: u32) -> String {
    format!(
        "{}/{}/{:03}/{:03}",
        translation.to_uppercase(),
        book_id.to_uppercase(),
        chapter,
        verse
    )
}

fn decode_verse_key(key: &str) -> Result<(String, u32, u32)> {
    let parts: Vec<&str> = key.split('/').collect();
    if parts.len() != 4 {
        return Err(ScriptureError::Internal {
            message: format!("malformed verse key: {}", key),
        });
    }
    let chapter = parts[2].parse().map_err(|_| ScriptureError::Internal {
        message: format!("malformed chapter in verse key: {}", key),
    })?;
    let verse = parts[3].parse().map_err(|_| ScriptureError::Internal {
        message: format!("malformed verse in verse key: {}", key),
    })?;
    Ok((parts[1].to_string(), chapter, verse))
}

/// Compress text data
fn compress_text(text: &str) -> Result<Vec<u8>> {
    use std::io::Write;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(text.as_bytes())?;
    encoder.finish().map_err(|e| ScriptureError::Internal {
        message: format!("Compression failed: {}", e),
    })
}

/// Decompress text data
fn decompress_text(data: &[u8]) -> Result<String> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decompressed = String::new();
    decoder
        .read_to_string(&mut decompressed)
        .map_err(|e| ScriptureError::Internal {
            message: format!("Decompression failed: {}", e),
        })?;
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config(dir: &tempfile::TempDir, compression: bool) -> StorageConfig {
        StorageConfig {
            db_path: PathBuf::from(dir.path()).join("verses.db"),
            enable_compression: compression,
        }
    }

    #[tokio::test]
    async fn test_verse_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = VerseStorage::new(test_config(&dir, false)).await.unwrap();

        storage
            .load_verse("KJV", "JHN", 11, 35, "Jesus wept.")
            .await
            .unwrap();
        storage.finish_load().await.unwrap();

        let text = storage.fetch("KJV", "JHN", 11, 35).await.unwrap();
        assert_eq!(text.as_deref(), Some("Jesus wept."));

        // Codes are case-insensitive in the key encoding.
        let text = storage.fetch("kjv", "jhn", 11, 35).await.unwrap();
        assert_eq!(text.as_deref(), Some("Jesus wept."));

        assert_eq!(storage.fetch("KJV", "JHN", 11, 36).await.unwrap(), None);
        assert_eq!(storage.fetch("WEB", "JHN", 11, 35).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_compressed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = VerseStorage::new(test_config(&dir, true)).await.unwrap();

        let text = "For God so loved the world, that he gave his only begotten Son.";
        storage.load_verse("KJV", "JHN", 3, 16, text).await.unwrap();
        assert_eq!(
            storage.fetch("KJV", "JHN", 3, 16).await.unwrap().as_deref(),
            Some(text)
        );
    }

    #[tokio::test]
    async fn test_translation_registry() {
        let dir = tempfile::tempdir().unwrap();
        let storage = VerseStorage::new(test_config(&dir, false)).await.unwrap();

        assert!(!storage.has_translation("KJV").await.unwrap());
        storage
            .register_translation(&TranslationRecord {
                id: "KJV".to_string(),
                name: "King James Version".to_string(),
                language: "en".to_string(),
            })
            .await
            .unwrap();
        assert!(storage.has_translation("KJV").await.unwrap());
        assert!(storage.has_translation("kjv").await.unwrap());
        assert_eq!(storage.translations().await.unwrap(), vec!["KJV"]);
    }

    #[tokio::test]
    async fn test_scan_translation_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = VerseStorage::new(test_config(&dir, false)).await.unwrap();

        storage.load_verse("KJV", "GEN", 1, 2, "v2").await.unwrap();
        storage.load_verse("KJV", "GEN", 1, 1, "v1").await.unwrap();
        storage.load_verse("KJV", "GEN", 1, 10, "v10").await.unwrap();
        storage.load_verse("WEB", "GEN", 1, 1, "other").await.unwrap();
        storage.finish_load().await.unwrap();

        let entries = storage.scan_translation("KJV").await.unwrap();
        let verses: Vec<u32> = entries.iter().map(|e| e.verse).collect();
        // Zero-padded keys keep numeric order under lexicographic scan.
        assert_eq!(verses, vec![1, 2, 10]);
        assert!(entries.iter().all(|e| e.book_id == "GEN"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let storage = VerseStorage::new(test_config(&dir, false)).await.unwrap();
        storage.health_check().await.unwrap();
    }
}
