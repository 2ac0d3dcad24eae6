//! # Questsmith HTTP Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//!
//! ## Overview
//!
//! The JSON API served by `questsmith serve`:
//!
//! | Route | Handler | Purpose |
//! |---|---|---|
//! | `GET /` | `index` | Landing page |
//! | `POST /generate` | `generate` | Keyword prompt in, quest out |
//! | `POST /generate_quest` | `generate` | Legacy alias of `/generate` |
//! | `GET /status` | `status` | Uptime, request count, host usage |
//!
//! Handlers share an `AppState`: the quest generator and a `ServerContext`
//! holding the process-wide counters. Both are injected, so tests build
//! independent instances.
//!
//! ## Generation flow
//!
//! 1. Reject a missing or empty prompt with 400.
//! 2. Run the generator on a separate task, timing the call. A panic in that
//!    task is reported as a 500 carrying the panic message.
//! 3. Strip echoed JSON from the output (`cleanup::clean_quest`).
//! 4. Reject an empty quest, or one identical to the prompt, with 500.
//! 5. Count the success and return `{quest, prompt, elapsed_time}`.
//!
use super::cleanup;
use crate::common::quest::QuestGenerator;
use crate::common::system;
use crate::core::templating;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide counters and static facts reported by `/status`.
#[derive(Debug)]
pub struct ServerContext {
    started: Instant,
    total_requests: AtomicU64,
    model_name: String,
    model_loaded: bool,
}

impl ServerContext {
    pub fn new(model_name: impl Into<String>, model_loaded: bool) -> Self {
        Self {
            started: Instant::now(),
            total_requests: AtomicU64::new(0),
            model_name: model_name.into(),
            model_loaded,
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Counts one successful generation response.
    pub fn record_success(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<QuestGenerator>,
    pub context: Arc<ServerContext>,
}

#[derive(Deserialize, Debug)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GenerateResponse {
    pub quest: String,
    pub prompt: String,
    pub elapsed_time: f64,
}

#[derive(Serialize, Debug)]
pub struct StatusResponse {
    status: &'static str,
    version: &'static str,
    model: ModelStatus,
    system: SystemStatus,
    timestamp: String,
}

#[derive(Serialize, Debug)]
struct ModelStatus {
    name: String,
    loaded: bool,
    uptime_seconds: f64,
}

#[derive(Serialize, Debug)]
struct SystemStatus {
    cpu_percent: Metric,
    memory_percent: Metric,
    total_requests: u64,
}

/// A percentage, or the string `"N/A"` when the probe failed.
#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
enum Metric {
    Percent(f64),
    Unavailable(&'static str),
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Metric::Unavailable("N/A"), Metric::Percent)
    }
}

/// Failures surfaced to HTTP clients as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// Missing/empty prompt or an unreadable request body (400).
    InvalidInput(String),
    /// The generator produced nothing usable (500).
    DegenerateOutput,
    /// Anything else (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::DegenerateOutput => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate a valid quest".to_string(),
            ),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Routes without middleware; `server_logic::create_app` adds the layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/generate_quest", post(generate))
        .route("/status", get(status))
        .with_state(state)
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    templating::render_index(VERSION, &state.context.model_name)
        .map(Html)
        .map_err(|e| {
            error!("Failed to render landing page: {:#}", e);
            ApiError::Internal(e.to_string())
        })
}

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected generate request body: {}", rejection.body_text());
        ApiError::InvalidInput(rejection.body_text())
    })?;

    let prompt = match request.prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return Err(ApiError::InvalidInput("Prompt is required".to_string())),
    };

    let started = Instant::now();
    let generator = state.generator.clone();
    let task_prompt = prompt.clone();
    let raw = tokio::spawn(async move { generator.generate(&task_prompt).await })
        .await
        .map_err(|e| {
            error!("Quest generation task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?;

    let quest = cleanup::clean_quest(&raw, &prompt);
    if quest.is_empty() || quest == prompt {
        warn!("Degenerate quest for prompt '{}'", prompt);
        return Err(ApiError::DegenerateOutput);
    }

    let elapsed_time = started.elapsed().as_secs_f64();
    state.context.record_success();
    info!(
        "Generated quest for '{}' in {:.3}s ({} total)",
        prompt,
        elapsed_time,
        state.context.total_requests()
    );

    Ok(Json(GenerateResponse {
        quest,
        prompt,
        elapsed_time,
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let usage = system::probe().await;
    let context = &state.context;
    Json(StatusResponse {
        status: "running",
        version: VERSION,
        model: ModelStatus {
            name: context.model_name.clone(),
            loaded: context.model_loaded,
            uptime_seconds: context.uptime_seconds(),
        },
        system: SystemStatus {
            cpu_percent: usage.cpu_percent.into(),
            memory_percent: usage.memory_percent.into(),
            total_requests: context.total_requests(),
        },
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}
