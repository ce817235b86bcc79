//! JSON HTTP server for the notes browser.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/search?str=..&cache=..` | Keyword search |
//! | `POST` | `/search` | Keyword search, form-encoded body with the same fields |
//! | `GET`  | `/tags.json` | Tag and folder names for autocomplete |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Every error is JSON, never HTML:
//!
//! ```json
//! { "error": { "code": "enumeration_failed", "message": "failed to enumerate notes: ..." } }
//! ```
//!
//! Error codes: `bad_request` (400), `enumeration_failed` (500), `timeout` (408),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser UI can be
//! served from a different origin.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Form, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use notecase_core::engine::SearchEngine;
use notecase_core::models::SearchOutcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::search::build_engine;
use crate::tags::{collect_tags, TagEntry};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (wrapped in `Arc` for cheap cloning across handlers).
    config: Arc<Config>,
    /// One engine shared by every request; searches run on the blocking pool.
    engine: Arc<SearchEngine>,
}

impl AppState {
    /// State over the filesystem stores described by `config`.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::with_engine(config, build_engine(config)?))
    }

    /// State over an already built engine, e.g. one with custom stores.
    pub fn with_engine(config: &Config, engine: SearchEngine) -> Self {
        Self {
            config: Arc::new(config.clone()),
            engine: Arc::new(engine),
        }
    }
}

/// Starts the HTTP server on `[server].bind` and serves until the process
/// is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        cache = config.cache.enabled,
        root = %config.docs.root.display(),
        "notecase server listening on http://{}",
        bind_addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(handle_search_get).post(handle_search_post))
        .route("/tags.json", get(handle_tags))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    /// The error detail object.
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"timeout"`, `"enumeration_failed"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn enumeration_failed(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "enumeration_failed".to_string(),
        message: message.into(),
    }
}

fn timeout_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::REQUEST_TIMEOUT,
        code: "timeout".to_string(),
        message: message.into(),
    }
}

fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET|POST /search ============

/// Query-string or form fields accepted by `/search`.
#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    /// Raw comma-separated keywords. Absent is the same as empty.
    #[serde(rename = "str")]
    query: Option<String>,
    /// Boolean-ish cache flag, see [`parse_flag`].
    cache: Option<String>,
}

// Extractor rejections become JSON `bad_request` errors.
async fn handle_search_get(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchOutcome>, AppError> {
    let Query(params) = params.map_err(|rejection| bad_request(rejection.body_text()))?;
    search(state, params).await
}

async fn handle_search_post(
    State(state): State<AppState>,
    params: Result<Form<SearchParams>, FormRejection>,
) -> Result<Json<SearchOutcome>, AppError> {
    let Form(params) = params.map_err(|rejection| bad_request(rejection.body_text()))?;
    search(state, params).await
}

/// Runs the search on the blocking pool, bounded by `search.scan_timeout_secs`.
///
/// On timeout the blocking task keeps running to completion in the
/// background; its result (and any cache write) is simply not awaited.
async fn search(state: AppState, params: SearchParams) -> Result<Json<SearchOutcome>, AppError> {
    let query = params.query.unwrap_or_default();
    let use_cache = params.cache.as_deref().map(parse_flag).unwrap_or(true);
    let secs = state.config.search.scan_timeout_secs;

    let engine = state.engine.clone();
    let task = tokio::task::spawn_blocking(move || engine.search(&query, use_cache));

    match tokio::time::timeout(Duration::from_secs(secs), task).await {
        Ok(Ok(Ok(outcome))) => Ok(Json(outcome)),
        Ok(Ok(Err(err))) => {
            error!("search failed: {}", err);
            Err(enumeration_failed(err.to_string()))
        }
        Ok(Err(join_err)) => {
            error!("search task failed: {}", join_err);
            Err(internal_error(format!("search task failed: {}", join_err)))
        }
        Err(_) => Err(timeout_error(format!("search timed out after {}s", secs))),
    }
}

/// `0`, `false`, `no` and `off` (any case) switch a flag off; anything
/// else, including an empty value, leaves it on.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

// ============ GET /tags.json ============

async fn handle_tags(State(state): State<AppState>) -> Result<Json<Vec<TagEntry>>, AppError> {
    let config = state.config.clone();
    let tags = tokio::task::spawn_blocking(move || collect_tags(&config))
        .await
        .map_err(|e| internal_error(format!("tags task failed: {}", e)))?
        .map_err(|e| internal_error(format!("{:#}", e)))?;
    Ok(Json(tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, DocsConfig, SearchConfig, ServerConfig, TagsConfig};
    use notecase_core::engine::EngineOptions;
    use notecase_core::models::DocumentRef;
    use notecase_core::store::memory::InMemoryContentStore;
    use notecase_core::store::{ContentError, ContentStore};
    use std::path::PathBuf;

    /// Content store whose listing takes longer than any sane scan budget.
    struct StalledStore {
        delay: Duration,
    }

    impl ContentStore for StalledStore {
        fn list_documents(&self) -> Result<Vec<DocumentRef>, ContentError> {
            std::thread::sleep(self.delay);
            Ok(vec![DocumentRef::new("late.md")])
        }

        fn read_document(&self, _doc: &DocumentRef) -> Result<String, ContentError> {
            Ok(String::new())
        }
    }

    fn test_config(scan_timeout_secs: u64) -> Config {
        Config {
            docs: DocsConfig {
                root: PathBuf::from("./unused"),
                include_globs: vec!["**/*.md".to_string()],
                exclude_globs: vec![],
                follow_symlinks: false,
            },
            cache: CacheConfig::default(),
            search: SearchConfig {
                scan_timeout_secs,
                ..SearchConfig::default()
            },
            tags: TagsConfig::default(),
            server: ServerConfig {
                bind: "127.0.0.1:0".to_string(),
            },
        }
    }

    async fn error_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn params(query: &str) -> SearchParams {
        SearchParams {
            query: Some(query.to_string()),
            cache: None,
        }
    }

    #[tokio::test]
    async fn test_slow_scan_times_out_with_json_408() {
        let config = test_config(1);
        let store = Arc::new(StalledStore {
            delay: Duration::from_secs(3),
        });
        let engine = SearchEngine::new(store, EngineOptions::default());
        let state = AppState::with_engine(&config, engine);

        let err = search(state, params("late")).await.unwrap_err();
        let (status, body) = error_json(err).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["error"]["code"], "timeout");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("timed out after 1s"));
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_json_500() {
        let config = test_config(5);
        let store = Arc::new(InMemoryContentStore::new().with_listing_error("offline"));
        let engine = SearchEngine::new(store, EngineOptions::default());
        let state = AppState::with_engine(&config, engine);

        let err = search(state, params("milk")).await.unwrap_err();
        let (status, body) = error_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "enumeration_failed");
    }

    #[tokio::test]
    async fn test_injected_engine_serves_results() {
        let config = test_config(5);
        let store = Arc::new(InMemoryContentStore::new().with_note("notes/todo.md", "buy milk"));
        let engine = SearchEngine::new(store, EngineOptions::default());
        let state = AppState::with_engine(&config, engine);

        let Json(outcome) = search(state, params("MILK")).await.ok().unwrap();
        let result = outcome.into_result().unwrap();
        assert_eq!(result.pattern, "milk");
        assert_eq!(result.files.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_request_is_json_400() {
        let (status, body) = error_json(bad_request("duplicate field `str`")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
        assert_eq!(body["error"]["message"], "duplicate field `str`");
    }

    #[test]
    fn test_parse_flag_off_values() {
        for value in ["0", "false", "FALSE", "No", "off", " off "] {
            assert!(!parse_flag(value), "{} should disable", value);
        }
    }

    #[test]
    fn test_parse_flag_on_values() {
        for value in ["1", "true", "yes", "on", "", "whatever"] {
            assert!(parse_flag(value), "{} should enable", value);
        }
    }

    #[test]
    fn test_search_params_field_names() {
        let params: SearchParams = serde_json::from_value(serde_json::json!({
            "str": "milk,todo",
            "cache": "0"
        }))
        .unwrap();
        assert_eq!(params.query.as_deref(), Some("milk,todo"));
        assert_eq!(params.cache.as_deref(), Some("0"));

        let empty: SearchParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.query.is_none());
        assert!(empty.cache.is_none());
    }
}
