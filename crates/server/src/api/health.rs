//! Banner and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::keep_alive::KeepAliveStatus;
use crate::state::AppState;

#[derive(Serialize)]
pub struct Banner {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: [&'static str; 5],
}

pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "TaskMate API is running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: [
            "/api/health",
            "/api/tasks",
            "/api/tasks/stats/summary",
            "/api/notes",
            "/api/projects",
        ],
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub keep_alive: KeepAliveStatus,
    pub timestamp: DateTime<Utc>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let keep_alive = state.keep_alive.lock().await.status();
    Json(HealthResponse {
        status: "ok",
        database: "connected",
        version: env!("CARGO_PKG_VERSION"),
        keep_alive,
        timestamp: Utc::now(),
    })
}
