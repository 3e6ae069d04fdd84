//! Liveness and database connectivity endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Database check response
#[derive(Serialize)]
pub struct DbCheckResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_time: Option<String>,
}

/// GET /health - process is up, database not consulted
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/debug/db - round-trip a trivial query
async fn debug_db(State(state): State<Arc<AppState>>) -> (StatusCode, Json<DbCheckResponse>) {
    match state.probe.current_time().await {
        Ok(now) => (
            StatusCode::OK,
            Json(DbCheckResponse {
                status: "success",
                message: "database connection OK".to_string(),
                current_time: Some(now.to_rfc3339()),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbCheckResponse {
                    status: "error",
                    message: e.to_string(),
                    current_time: None,
                }),
            )
        }
    }
}

/// Diagnostics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/debug/db", get(debug_db))
}
