//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the two logical operations - verse lookup and
//! scripture search - plus health and statistics endpoints.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with citations, search queries, translations
//! - **Output**: JSON responses with verse data, search results, summaries
//! - **Errors**: Every component error is recovered here and rendered as a
//!   structured response with a suggestion and a valid-format example
//!
//! ## Key Features
//! - CORS support for web frontends
//! - Per-request ids in the logs
//! - Error-to-status mapping by error category

use crate::errors::{Result, ScriptureError};
use crate::search::{SearchResult, VerseData};
use crate::utils::{SystemUtils, Timer};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// API server over the shared application state
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Search request payload
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub translation: Option<String>,
    pub limit: Option<usize>,
}

/// Search response payload
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub translation: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub testament_distribution: BTreeMap<String, usize>,
    pub books_found: Vec<String>,
    pub genre_distribution: BTreeMap<String, usize>,
    pub query_time_ms: u64,
}

/// Verse lookup request parameters
#[derive(Debug, Deserialize)]
pub struct VerseRequest {
    pub reference: String,
    pub translation: Option<String>,
}

/// Verse lookup response payload
#[derive(Debug, Serialize)]
pub struct VerseResponse {
    #[serde(flatten)]
    pub verse: VerseData,
    pub query_time_ms: u64,
}

/// Structured error payload relayed to the caller
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub category: &'static str,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub components: HealthComponents,
}

/// Component health status
#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub storage: String,
    pub index: String,
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: crate::AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until shutdown
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;

        tracing::info!("Starting API server on {}", bind_addr);

        let app_state = self.app_state.clone();
        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };
            App::new()
                .wrap(cors)
                .app_data(web::Data::new(app_state.clone()))
                .route("/search", web::post().to(search_handler))
                .route("/verse", web::get().to(verse_handler))
                .route("/health", web::get().to(health_handler))
                .route("/stats", web::get().to(stats_handler))
                .route("/", web::get().to(index_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| ScriptureError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run()
        .await
        .map_err(|e| ScriptureError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Map a component error to an HTTP response; nothing escapes unhandled.
fn error_response(err: &ScriptureError) -> HttpResponse {
    let payload = ErrorResponse {
        error: err.to_string(),
        category: err.category(),
        suggestion: err.suggestion(),
        example: err.example(),
    };
    match err {
        ScriptureError::UnknownBook { .. }
        | ScriptureError::MalformedReference { .. }
        | ScriptureError::InvalidRange { .. }
        | ScriptureError::ChapterOutOfRange { .. }
        | ScriptureError::VerseOutOfRange { .. }
        | ScriptureError::MalformedQuery { .. }
        | ScriptureError::InvalidSearchQuery { .. } => HttpResponse::BadRequest().json(payload),
        ScriptureError::TranslationNotFound { .. } | ScriptureError::VerseNotFound { .. } => {
            HttpResponse::NotFound().json(payload)
        }
        ScriptureError::SearchTimeout { .. } => HttpResponse::GatewayTimeout().json(payload),
        _ => HttpResponse::InternalServerError().json(payload),
    }
}

/// Search endpoint handler
async fn search_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<SearchRequest>,
) -> ActixResult<HttpResponse> {
    let request_id = Uuid::new_v4();
    let timer = Timer::new("search");
    tracing::info!(%request_id, query = %request.query, "search request");

    match app_state
        .engine
        .search(
            &request.query,
            request.translation.as_deref(),
            request.limit,
        )
        .await
    {
        Ok(outcome) => {
            let translation = request
                .translation
                .clone()
                .unwrap_or_else(|| app_state.config.search.default_translation.clone())
                .to_uppercase();
            let response = SearchResponse {
                query: request.query.clone(),
                translation,
                total_results: outcome.summary.total_results,
                testament_distribution: outcome.summary.testament_distribution.clone(),
                books_found: outcome.summary.books_found.clone(),
                genre_distribution: outcome.summary.genre_distribution.clone(),
                results: outcome.results,
                query_time_ms: timer.stop(),
            };
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            tracing::warn!(%request_id, error = %e, "search failed");
            Ok(error_response(&e))
        }
    }
}

/// Verse lookup endpoint handler
async fn verse_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Query<VerseRequest>,
) -> ActixResult<HttpResponse> {
    let request_id = Uuid::new_v4();
    let timer = Timer::new("lookup");
    tracing::info!(%request_id, reference = %request.reference, "verse request");

    match app_state
        .engine
        .lookup(&request.reference, request.translation.as_deref())
        .await
    {
        Ok(verse) => Ok(HttpResponse::Ok().json(VerseResponse {
            verse,
            query_time_ms: timer.stop(),
        })),
        Err(e) => {
            tracing::warn!(%request_id, error = %e, "lookup failed");
            Ok(error_response(&e))
        }
    }
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let storage_status = match app_state.storage.health_check().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };
    let default_translation = &app_state.config.search.default_translation;
    let index_status = if app_state.index.is_built(default_translation) {
        "healthy"
    } else {
        "empty"
    };

    let response = HealthResponse {
        status: if storage_status == "healthy" {
            "healthy".to_string()
        } else {
            "unhealthy".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: HealthComponents {
            storage: storage_status.to_string(),
            index: index_status.to_string(),
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let index_stats = app_state.index.get_stats();
    let response = match app_state.storage.get_stats().await {
        Ok(storage_stats) => serde_json::json!({
            "storage": {
                "total_verses": storage_stats.total_verses,
                "translations": storage_stats.translations,
                "database_size": SystemUtils::format_bytes(storage_stats.database_size_bytes),
                "last_loaded": storage_stats.last_loaded,
            },
            "index": index_stats,
        }),
        Err(e) => serde_json::json!({
            "storage": { "error": e.to_string() },
            "index": index_stats,
        }),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Scripture Search Engine</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .header { color: #2c3e50; }
            .endpoint { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1 class="header">Scripture Search Engine API</h1>
        <p>Fast verse lookup and full-text search across biblical translations.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">POST</span> /search
            <p>Full-text search. Supports quoted phrases and AND / OR / NOT operators.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /verse?reference=John+3:16&amp;translation=KJV
            <p>Look up a verse or a same-chapter verse range by citation.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /health
            <p>Check the health status of all system components.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /stats
            <p>Get storage and index statistics.</p>
        </div>

        <h2>Example Search Request</h2>
        <pre>{
  "query": "\"love your enemies\" AND faith",
  "translation": "KJV",
  "limit": 10
}</pre>
    </body>
    </html>
    "#;

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}
