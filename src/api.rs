//! HTTP API endpoints.
//!
//! Read-only views for displays and tooling that do not hold a websocket.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::protocol::GameSnapshot;
use crate::state::AppState;
use crate::types::GameConfig;

/// Current game snapshot.
///
/// GET /api/snapshot
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<GameSnapshot> {
    Json(state.snapshot().await)
}

/// Timing and limits the engine runs with.
///
/// GET /api/config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<GameConfig> {
    Json(state.config.clone())
}

/// GET /api/health
pub async fn health() -> &'static str {
    "ok"
}

pub fn router() -> axum::Router<Arc<AppState>> {
    use axum::routing::get;

    axum::Router::new()
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/config", get(get_config))
        .route("/api/health", get(health))
}
