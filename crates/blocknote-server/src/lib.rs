//! HTTP server for blocknote's generation and summarization endpoints.
//!
//! | Route | Body | Success |
//! |-------|------|---------|
//! | `POST /api/generate` | `{ prompt }` | `{ blocks, message? }` |
//! | `POST /api/summarize` | `{ content, type? }` | `{ summary }` |
//! | `GET /health` | | `{ status: "ok" }` |
//!
//! Errors are `{ error, details? }` with 400 for bad input and 500 for
//! backend failures. Without a Gemini API key, generation falls back to
//! [`StubGenerator`] and summarization is unavailable.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use blocknote_dispatch::{
    ErrorBody, GeminiConfig, GenerateResponse, SummarizeKind, SummarizeResponse,
};

pub mod gemini;
pub mod generator;
pub mod summarizer;

pub use generator::{BlockGenerator, GeminiGenerator, StubGenerator, parse_blocks};
pub use summarizer::{GeminiSummarizer, Summarizer};

/// Failure talking to a model backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("http error: {0}")]
    Http(String),

    #[error("bad response: {0}")]
    Response(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error returned from a handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{error}")]
    Internal {
        error: &'static str,
        details: Option<String>,
    },
}

const PROMPT_REQUIRED: &str = "Prompt is required and must be a string";
const CONTENT_REQUIRED: &str = "Content is required";
const GENERATE_FAILED: &str = "Failed to generate content";
const SUMMARY_FAILED: &str = "Failed to generate summary";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(error) => (StatusCode::BAD_REQUEST, ErrorBody::new(error)),
            ApiError::Internal { error, details } => {
                let mut body = ErrorBody::new(error);
                body.details = details;
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Backends shared by every handler.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn BlockGenerator>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn BlockGenerator>,
        summarizer: Option<Arc<dyn Summarizer>>,
    ) -> Self {
        Self {
            generator,
            summarizer,
        }
    }

    /// Gemini backends when an API key resolves, else the stub generator and
    /// no summarizer.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, BackendError> {
        match config.resolve_api_key() {
            Some(key) => {
                let client = gemini::GeminiClient::new(config, key)?;
                info!(model = %client.model(), "using Gemini backend");
                Ok(Self::new(
                    Arc::new(GeminiGenerator::new(client.clone())),
                    Some(Arc::new(GeminiSummarizer::new(client))),
                ))
            }
            None => {
                warn!(
                    env = %config.api_key_env,
                    "no Gemini API key, serving stub responses"
                );
                Ok(Self::new(Arc::new(StubGenerator), None))
            }
        }
    }

    /// Name of the generation backend.
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }
}

/// Build the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate))
        .route("/api/summarize", post(summarize))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `listen` and serve until ctrl-c.
pub async fn run_server(listen: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .context("bind server listener failed")?;
    info!(
        addr = %listener.local_addr()?,
        backend = state.generator_name(),
        "blocknote server listening"
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn summary_failed() -> ApiError {
    ApiError::Internal {
        error: SUMMARY_FAILED,
        details: None,
    }
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Parse a request body as JSON whatever its `Content-Type` says.
fn parse_body(body: &Bytes) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Non-blank string field of a JSON object body.
fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

async fn generate(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let body = parse_body(&payload).map_err(|e| ApiError::Internal {
        error: GENERATE_FAILED,
        details: Some(e.to_string()),
    })?;
    let prompt = string_field(&body, "prompt").ok_or(ApiError::BadRequest(PROMPT_REQUIRED))?;

    let response = state.generator.generate(prompt).await.map_err(|e| {
        warn!(backend = state.generator.name(), error = %e, "generation failed");
        ApiError::Internal {
            error: GENERATE_FAILED,
            details: Some(e.to_string()),
        }
    })?;
    info!(backend = state.generator.name(), blocks = response.blocks.len(), "generated");
    Ok(Json(response))
}

async fn summarize(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let body = parse_body(&payload).map_err(|e| {
        warn!(error = %e, "unreadable summarize request");
        summary_failed()
    })?;
    let content = string_field(&body, "content").ok_or(ApiError::BadRequest(CONTENT_REQUIRED))?;
    let kind = match body.get("type").and_then(Value::as_str) {
        Some(name) => SummarizeKind::from_str(name),
        None => Some(SummarizeKind::default()),
    };

    let Some(summarizer) = &state.summarizer else {
        warn!("summarize requested but no API key is configured");
        return Err(summary_failed());
    };
    let summary = summarizer.summarize(content, kind).await.map_err(|e| {
        warn!(error = %e, "summarization failed");
        summary_failed()
    })?;
    Ok(Json(SummarizeResponse { summary }))
}
