//! JSON HTTP surface over the research pipeline.
//!
//! Lets a request handler in another process merge, validate, or assess
//! research without linking the crate.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/requirements` | Duration → requirement table |
//! | `POST` | `/merge` | Merge web sources and user documents |
//! | `POST` | `/validate` | Validate a corpus for a target duration |
//! | `POST` | `/assess` | Merge, then validate |
//! | `POST` | `/overlap` | Report overlapping sources within a corpus |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "duration_minutes must be >= 1" } }
//! ```
//!
//! Malformed JSON bodies are rejected by the `Json` extractor before reaching
//! a handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::adequacy::{
    calculate_adequacy_percentage, detect_duplicate_content, validate_research_for_duration,
    ContentOverlap, ValidationResult,
};
use crate::config::Config;
use crate::input::deserialize_records;
use crate::merge::{merge_research_sources, MergeOptions, MergeResult};
use crate::models::{Origin, Source, SourceRecord};
use crate::pipeline::{assess, Assessment};
use crate::thresholds::{Requirement, FLOOR_REQUIREMENT, REQUIREMENT_CHECKPOINTS};

/// Shared state passed to every handler.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Build the router. Separate from [`run_server`] so tests can drive it
/// in-process.
pub fn router(config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/requirements", get(handle_requirements))
        .route("/merge", post(handle_merge))
        .route("/validate", post(handle_validate))
        .route("/assess", post(handle_assess))
        .route("/overlap", post(handle_overlap))
        .layer(cors)
        .with_state(AppState { config })
}

/// Bind to `[server].bind` and serve until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()));

    info!(bind = %bind_addr, "research server listening");
    println!("Research server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

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

fn resolve_duration(requested: Option<u32>, config: &Config) -> Result<u32, AppError> {
    match requested {
        Some(0) => Err(bad_request("duration_minutes must be >= 1")),
        Some(minutes) => Ok(minutes),
        None => Ok(config.validation.default_duration_minutes),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /requirements ============

#[derive(Serialize)]
struct Checkpoint {
    minutes: u32,
    requirement: Requirement,
}

#[derive(Serialize)]
struct RequirementsResponse {
    floor: Requirement,
    checkpoints: Vec<Checkpoint>,
}

async fn handle_requirements() -> Json<RequirementsResponse> {
    Json(RequirementsResponse {
        floor: FLOOR_REQUIREMENT,
        checkpoints: REQUIREMENT_CHECKPOINTS
            .iter()
            .map(|(minutes, requirement)| Checkpoint {
                minutes: *minutes,
                requirement: *requirement,
            })
            .collect(),
    })
}

// ============ POST /merge ============

#[derive(Deserialize)]
struct MergeRequest {
    #[serde(default, deserialize_with = "deserialize_records")]
    web_sources: Vec<SourceRecord>,
    #[serde(default, deserialize_with = "deserialize_records")]
    user_documents: Vec<SourceRecord>,
    /// Falls back to `[merge]` from config.
    #[serde(default)]
    options: Option<MergeOptions>,
}

async fn handle_merge(
    State(state): State<AppState>,
    Json(req): Json<MergeRequest>,
) -> Json<MergeResult> {
    let options = req
        .options
        .unwrap_or_else(|| state.config.merge.to_options());
    Json(merge_research_sources(
        &req.web_sources,
        &req.user_documents,
        &options,
    ))
}

// ============ POST /validate ============

#[derive(Deserialize)]
struct ValidateRequest {
    #[serde(default, deserialize_with = "deserialize_records")]
    sources: Vec<SourceRecord>,
    #[serde(default)]
    duration_minutes: Option<u32>,
    #[serde(default)]
    has_user_documents: bool,
}

#[derive(Serialize)]
struct ValidateResponse {
    #[serde(flatten)]
    validation: ValidationResult,
    adequacy_percentage: u8,
}

async fn handle_validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    let duration = resolve_duration(req.duration_minutes, &state.config)?;
    let sources = to_sources(&req.sources);
    let validation = validate_research_for_duration(&sources, duration, req.has_user_documents);
    let adequacy_percentage = calculate_adequacy_percentage(&validation);
    Ok(Json(ValidateResponse {
        validation,
        adequacy_percentage,
    }))
}

// ============ POST /assess ============

#[derive(Deserialize)]
struct AssessRequest {
    #[serde(default, deserialize_with = "deserialize_records")]
    web_sources: Vec<SourceRecord>,
    #[serde(default, deserialize_with = "deserialize_records")]
    user_documents: Vec<SourceRecord>,
    #[serde(default)]
    duration_minutes: Option<u32>,
    #[serde(default)]
    options: Option<MergeOptions>,
}

async fn handle_assess(
    State(state): State<AppState>,
    Json(req): Json<AssessRequest>,
) -> Result<Json<Assessment>, AppError> {
    let duration = resolve_duration(req.duration_minutes, &state.config)?;
    let options = req
        .options
        .unwrap_or_else(|| state.config.merge.to_options());
    Ok(Json(assess(
        &req.web_sources,
        &req.user_documents,
        duration,
        &options,
    )))
}

// ============ POST /overlap ============

#[derive(Deserialize)]
struct OverlapRequest {
    #[serde(default, deserialize_with = "deserialize_records")]
    sources: Vec<SourceRecord>,
}

#[derive(Serialize)]
struct OverlapResponse {
    overlaps: Vec<ContentOverlap>,
}

async fn handle_overlap(Json(req): Json<OverlapRequest>) -> Json<OverlapResponse> {
    let sources = to_sources(&req.sources);
    Json(OverlapResponse {
        overlaps: detect_duplicate_content(&sources),
    })
}

fn to_sources(records: &[SourceRecord]) -> Vec<Source> {
    records
        .iter()
        .map(|r| Source::from_record(r, Origin::Web))
        .collect()
}
