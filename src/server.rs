//! HTTP API server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/verse?mandala=&sukta=&rik=` | Fetch and normalize one verse |
//! | `POST` | `/api/explain` | AI explanation (server credential) |
//! | `POST` | `/api/significance` | AI thematic significance (caller credential) |
//! | `GET`  | `/api/samples` | Curated sample verses |
//! | `GET`  | `/api/mandalas` | Hymn count per book |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Successful responses are wrapped as `{ "success": true, "data": ... }`.
//! Errors use the envelope described in [`crate::error`]. A panicking handler
//! is answered with the generic `internal` error instead of a dropped
//! connection.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser front end
//! served from another origin can call the API.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Request},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any as PanicPayload;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::commentary::{explain_verse, thematic_significance, CommentaryRequest};
use crate::config::{Config, LlmConfig};
use crate::error::ExplorerError;
use crate::llm::{ChatCompletionsClient, CompletionProvider};
use crate::lookup::lookup_raw;
use crate::models::NormalizedVerse;
use crate::samples::{mandalas, MandalaInfo, SampleVerse, SAMPLE_VERSES};
use crate::vedaweb::{VedaWebClient, VerseSource};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub verses: Arc<dyn VerseSource>,
    pub completions: Arc<dyn CompletionProvider>,
    pub llm: Arc<LlmConfig>,
}

impl AppState {
    /// Builds the production clients from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            verses: Arc::new(VedaWebClient::new(&config.vedaweb)?),
            completions: Arc::new(ChatCompletionsClient::new(&config.llm)?),
            llm: Arc::new(config.llm.clone()),
        })
    }
}

/// Success envelope.
#[derive(Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

/// Builds the router with panic, tracing and CORS layers applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/verse", get(handle_verse))
        .route("/api/explain", post(handle_explain))
        .route("/api/significance", post(handle_significance))
        .route("/api/samples", get(handle_samples))
        .route("/api/mandalas", get(handle_mandalas))
        .route("/health", get(handle_health))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

/// Starts the server on `[server].bind` and runs until the process exits.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    serve(&config.server.bind, state).await
}

/// Serves `state` on `bind`. Split out so callers can inject their own sources.
pub async fn serve(bind: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %bind, "rigveda explorer listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn handle_panic(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ExplorerError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
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

// ============ GET /api/verse ============

/// Parameters are taken as raw strings so validation can name the bad field.
async fn handle_verse(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<NormalizedVerse>>, ExplorerError> {
    let verse = lookup_raw(
        state.verses.as_ref(),
        params.get("mandala").map(String::as_str),
        params.get("sukta").map(String::as_str),
        params.get("rik").map(String::as_str),
    )
    .await?;
    Ok(ok(verse))
}

// ============ POST /api/explain, /api/significance ============

fn commentary_body(
    body: Result<Json<CommentaryRequest>, JsonRejection>,
) -> Result<CommentaryRequest, ExplorerError> {
    body.map(|Json(req)| req)
        .map_err(|rejection| ExplorerError::Validation(rejection.body_text()))
}

async fn handle_explain(
    State(state): State<AppState>,
    body: Result<Json<CommentaryRequest>, JsonRejection>,
) -> Result<Json<Envelope<Value>>, ExplorerError> {
    let req = commentary_body(body)?;
    let text = explain_verse(state.completions.as_ref(), &state.llm, &req).await?;
    Ok(ok(json!({ "explanation": text })))
}

/// The caller's key may come from the body or an `Authorization: Bearer` header.
/// A blank body key counts as absent.
async fn handle_significance(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CommentaryRequest>, JsonRejection>,
) -> Result<Json<Envelope<Value>>, ExplorerError> {
    let mut req = commentary_body(body)?;
    if req.caller_key().is_none() {
        req.api_key = bearer_token(&headers);
    }
    let text = thematic_significance(state.completions.as_ref(), &req).await?;
    Ok(ok(json!({ "significance": text })))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

// ============ Static data ============

async fn handle_samples() -> Json<Envelope<&'static [SampleVerse]>> {
    ok(SAMPLE_VERSES)
}

async fn handle_mandalas() -> Json<Envelope<Vec<MandalaInfo>>> {
    ok(mandalas())
}
