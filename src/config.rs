//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the scripture search engine,
//! supporting TOML files and environment variable overrides with validation
//! and type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, dependency verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use scripture_search::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{Result, ScriptureError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Verse storage settings
    pub storage: StorageConfig,
    /// Text index configuration
    pub index: IndexConfig,
    /// Search engine behavior
    pub search: SearchEngineConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
    /// Performance tuning
    pub performance: PerformanceConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable CORS for web frontends
    pub enable_cors: bool,
}

/// Verse storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file path
    pub db_path: PathBuf,
    /// Enable gzip compression of stored verse text
    pub enable_compression: bool,
}

/// Text index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// BM25 term frequency saturation parameter
    pub bm25_k1: f64,
    /// BM25 length normalization parameter
    pub bm25_b: f64,
}

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEngineConfig {
    /// Translation used when the caller does not name one
    pub default_translation: String,
    /// Default maximum number of results
    pub default_max_results: usize,
    /// Search timeout in milliseconds
    pub search_timeout_ms: u64,
    /// Minimum query length
    pub min_query_length: usize,
    /// Maximum query length
    pub max_query_length: usize,
    /// Word budget for result snippets
    pub snippet_words: usize,
}

/// Logging and monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

/// Performance tuning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Number of worker threads for the async runtime
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ScriptureError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ScriptureError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SCRIPTURE_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SCRIPTURE_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| ScriptureError::Config {
                message: "Invalid port number in SCRIPTURE_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(db_path) = std::env::var("SCRIPTURE_SEARCH_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }
        if let Ok(level) = std::env::var("SCRIPTURE_SEARCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ScriptureError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.search.min_query_length > self.search.max_query_length {
            return Err(ScriptureError::ValidationFailed {
                field: "search.min_query_length".to_string(),
                reason: "Minimum query length cannot be greater than maximum".to_string(),
            });
        }

        if self.search.default_max_results == 0 {
            return Err(ScriptureError::ValidationFailed {
                field: "search.default_max_results".to_string(),
                reason: "Result limit must be greater than zero".to_string(),
            });
        }

        if self.search.search_timeout_ms == 0 {
            return Err(ScriptureError::ValidationFailed {
                field: "search.search_timeout_ms".to_string(),
                reason: "Search timeout must be greater than zero".to_string(),
            });
        }

        if self.index.bm25_k1 <= 0.0 || !(0.0..=1.0).contains(&self.index.bm25_b) {
            return Err(ScriptureError::ValidationFailed {
                field: "index".to_string(),
                reason: "BM25 parameters out of range (k1 > 0, 0 <= b <= 1)".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScriptureError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                enable_cors: true,
            },
            storage: StorageConfig {
                db_path: PathBuf::from("./data/scripture.db"),
                enable_compression: true,
            },
            index: IndexConfig::default(),
            search: SearchEngineConfig {
                default_translation: "KJV".to_string(),
                default_max_results: 10,
                search_timeout_ms: 5000,
                min_query_length: 2,
                max_query_length: 1000,
                snippet_words: 32,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
            performance: PerformanceConfig {
                worker_threads: num_cpus::get(),
            },
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            bm25_k1: 1.2,
            bm25_b: 0.75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.search.default_translation, "KJV");
        assert_eq!(config.search.default_max_results, 10);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.index.bm25_k1, config.index.bm25_k1);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.min_query_length = 100;
        config.search.max_query_length = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.index.bm25_b = 2.0;
        assert!(config.validate().is_err());
    }
}
