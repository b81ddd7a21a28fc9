//! HTTP handlers, one sub-module per resource.
//!
//! Shared error shape and helpers live here in mod.rs.

mod health;
mod notes;
mod projects;
mod tasks;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskmate_core::TaskMateError;
use tracing::error;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<T, ApiError>;

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub(crate) fn not_found(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::NOT_FOUND, message)
}

/// Map a store error onto its status: validation 400, missing 404, the rest 500.
pub(crate) fn api_error(e: TaskMateError) -> ApiError {
    match e {
        TaskMateError::Validation(message) => bad_request(message),
        TaskMateError::NotFound { kind, .. } => not_found(format!("{} not found", kind)),
        other => {
            error!(error = %other, "request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

// ── JSON body extractor ──────────────────────────────────────────

/// `Json<T>` whose rejections use the shared `{ message }` error body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(bad_request(rejection.body_text())),
        }
    }
}

// ── Fallback ─────────────────────────────────────────────────────

pub async fn route_not_found() -> ApiError {
    not_found("Not Found")
}

// ── Re-exports ───────────────────────────────────────────────────
// Flat `api::foo` paths used by router.rs.

pub use health::{health, root};
pub use notes::{create_note, delete_note, get_note, list_notes, resolve_links, update_note};
pub use projects::{create_project, delete_project, get_project, list_projects, update_project};
pub use tasks::{create_task, delete_task, get_task, list_tasks, task_stats, update_task};
