// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// JSON endpoints live under `/api/v1/`. The HTML dashboard is served at `/`
// and its refresh button posts to `/refresh`. No endpoint needs credentials:
// the board is read-only apart from the refresh trigger.
//
// CORS is configured permissively; the board exposes no private data.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::api::dashboard::render_dashboard;
use crate::app_state::AppState;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Dashboard ───────────────────────────────────────────────
        .route("/", get(dashboard))
        .route("/refresh", post(dashboard_refresh))
        // ── JSON ────────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/signals", get(signals))
        .route("/api/v1/indicators", get(indicators))
        .route("/api/v1/refresh", post(refresh))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Dashboard (HTML)
// =============================================================================

async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot_or_compute().await;
    Html(render_dashboard(&snapshot))
}

async fn dashboard_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.refresh().await;
    Redirect::to("/")
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    pairs: usize,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        pairs: state.runtime_config.symbols.len(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Signals & indicators
// =============================================================================

async fn signals(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot_or_compute().await;
    Json(snapshot.as_ref().clone())
}

async fn indicators(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot_or_compute().await;
    Json(snapshot.indicator_lines())
}

// =============================================================================
// Manual refresh
// =============================================================================

async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.refresh().await;
    Json(snapshot.as_ref().clone())
}
