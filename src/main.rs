//! # Scripture Search Engine Main Driver
//!
//! ## Purpose
//! Main entry point for the scripture search server. Orchestrates
//! initialization of all system components and starts the web server for
//! handling lookup and search requests.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files, command line arguments, environment
//!   variables, optional verse data files (JSON Lines)
//! - **Output**: Running web server with lookup and search endpoints
//! - **Initialization**: Opens storage, builds the text index, health checks
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Build the canon catalog and open verse storage
//! 4. Optionally load verse data, then build the text index
//! 5. Start web API server
//! 6. Handle shutdown signals gracefully

use clap::{Arg, Command};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use scripture_search::{
    api::ApiServer,
    canon::Canon,
    config::Config,
    errors::{Result, ScriptureError},
    index::InvertedIndex,
    search::SearchEngine,
    storage::{TranslationRecord, VerseStorage, VerseStore},
    AppState,
};

fn main() -> Result<()> {
    let matches = Command::new("scripture-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Scripture Search Team")
        .about("Verse lookup and full-text scripture search engine")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("load")
                .long("load")
                .value_name("FILE")
                .help("Load verse data from a JSON Lines file before serving"),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Run health checks and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    // Override port if specified
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Scripture Search Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.performance.worker_threads)
        .enable_all()
        .build()?;

    let load_path = matches.get_one::<String>("load").cloned();
    let check_health = matches.get_flag("check-health");
    runtime.block_on(run(config, load_path, check_health))
}

async fn run(config: Arc<Config>, load_path: Option<String>, check_health: bool) -> Result<()> {
    // Initialize application components
    let app_state = initialize_components(config.clone(), load_path.as_deref()).await?;

    if check_health {
        info!("All health checks passed!");
        return Ok(());
    }

    // Start the API server
    let server = ApiServer::new(app_state.clone());

    info!(
        "Scripture Search Engine started successfully on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        result = server.run() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Scripture Search Engine shut down successfully");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config
            .logging
            .level
            .parse()
            .map_err(|_| ScriptureError::Config {
                message: format!("Invalid log level: {}", config.logging.level),
            })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);
    let fmt_layer = if config.logging.json_format {
        fmt_layer.json().with_filter(filter).boxed()
    } else {
        fmt_layer.with_filter(filter).boxed()
    };

    tracing_subscriber::registry().with(fmt_layer).init();

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Initialize all application components
async fn initialize_components(
    config: Arc<Config>,
    load_path: Option<&str>,
) -> Result<AppState> {
    info!("Initializing application components...");

    info!("Building canon catalog...");
    let canon = Arc::new(Canon::standard()?);

    info!("Opening verse storage...");
    let storage = Arc::new(VerseStorage::new(config.storage.clone()).await?);

    if let Some(path) = load_path {
        info!("Loading verse data from {}", path);
        let loaded = load_verse_file(&storage, &canon, Path::new(path)).await?;
        info!("Loaded {} verses", loaded);
    }

    info!("Building text index...");
    let index = Arc::new(InvertedIndex::new(config.index.clone()));
    for translation in storage.translations().await? {
        let entries = storage.scan_translation(&translation).await?;
        index.build_translation(&translation, &entries);
    }

    let engine = Arc::new(SearchEngine::new(
        config.clone(),
        canon.clone(),
        storage.clone(),
        index.clone(),
    ));

    // Verify component health
    storage.health_check().await?;
    info!("Storage manager is healthy");

    let app_state = AppState {
        config,
        canon,
        engine,
        storage,
        index,
    };

    info!("All components initialized successfully");
    Ok(app_state)
}

/// One verse per line in the data file.
#[derive(Debug, Deserialize)]
struct VerseLine {
    translation: String,
    book: String,
    chapter: u32,
    verse: u32,
    text: String,
    #[serde(default)]
    translation_name: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

/// Load a JSON Lines verse file into storage, validating books and bounds
/// against the catalog. Invalid lines are skipped with a warning.
async fn load_verse_file(
    storage: &VerseStorage,
    canon: &Canon,
    path: &Path,
) -> Result<usize> {
    let content = tokio::fs::read_to_string(path).await?;
    let mut loaded = 0usize;
    let mut registered: BTreeSet<String> = BTreeSet::new();

    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: VerseLine = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no + 1, e);
                continue;
            }
        };

        let Some(book) = canon.book(&record.book.to_uppercase()) else {
            warn!("Skipping line {}: unknown book {}", line_no + 1, record.book);
            continue;
        };
        let Some(max_verse) = book.verses_in_chapter(record.chapter) else {
            warn!(
                "Skipping line {}: {} has no chapter {}",
                line_no + 1,
                book.name,
                record.chapter
            );
            continue;
        };
        if record.verse < 1 || record.verse > max_verse as u32 {
            warn!(
                "Skipping line {}: {} {} has no verse {}",
                line_no + 1,
                book.name,
                record.chapter,
                record.verse
            );
            continue;
        }

        let translation = record.translation.to_uppercase();
        if registered.insert(translation.clone()) {
            storage
                .register_translation(&TranslationRecord {
                    id: translation.clone(),
                    name: record
                        .translation_name
                        .clone()
                        .unwrap_or_else(|| translation.clone()),
                    language: record.language.clone().unwrap_or_else(|| "en".to_string()),
                })
                .await?;
        }

        storage
            .load_verse(&translation, book.id, record.chapter, record.verse, &record.text)
            .await?;
        loaded += 1;
    }

    storage.finish_load().await?;
    Ok(loaded)
}
