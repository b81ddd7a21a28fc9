//! Task CRUD and the statistics summary.
//!
//! Every write that changes scored content goes through the prioritizer.
//! The store lock is never held across a scoring call: the scorer may run
//! an external process for several seconds.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::{debug, info};

use taskmate_core::patch::is_blank;
use taskmate_core::{NewTask, Task, TaskPatch};
use taskmate_prioritizer::{
    build_stats, completion_transition, needs_reclassification, ScoringInput, StatsSnapshot,
};

use super::{api_error, bad_request, not_found, ApiJson, ApiResult};
use crate::state::AppState;

const TASK_NOT_FOUND: &str = "Task not found";

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Task>>> {
    let mut tasks = state.tasks.read().await.list().map_err(api_error)?;
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.read().await.require(&id).map_err(api_error)?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    if is_blank(body.title.as_deref()) {
        return Err(bad_request("Title is required"));
    }

    let mut task = Task::from_new(body, Utc::now());
    let score = state.prioritizer.prioritize(&ScoringInput::from(&task)).await;
    task.apply_score(score);

    state.tasks.write().await.save(&task).map_err(api_error)?;
    info!(id = %task.id, label = %task.priority_label, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> ApiResult<Json<Task>> {
    if let Some(title) = &patch.title {
        if is_blank(title.as_deref()) {
            return Err(bad_request("Title cannot be empty"));
        }
    }

    // Score against a snapshot with the patch applied, outside the lock.
    let score = if needs_reclassification(&patch) {
        let mut preview = state.tasks.read().await.require(&id).map_err(api_error)?;
        preview.apply_patch(&patch, Utc::now());
        Some(state.prioritizer.prioritize(&ScoringInput::from(&preview)).await)
    } else {
        None
    };

    // Re-read under the write lock so updates committed while scoring survive.
    let store = state.tasks.write().await;
    let mut task = store.require(&id).map_err(api_error)?;
    let now = Utc::now();
    let previous_completed_at = task.completed_at;
    task.apply_patch(&patch, now);
    if let Some(score) = score {
        task.apply_score(score);
        debug!(id = %task.id, label = %task.priority_label, "Task reclassified");
    }
    task.completed_at = completion_transition(previous_completed_at, patch.completed, now);

    store.save(&task).map_err(api_error)?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.tasks.write().await.delete(&id).map_err(api_error)? {
        info!(id = %id, "Task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(TASK_NOT_FOUND))
    }
}

pub async fn task_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatsSnapshot>> {
    let tasks = state.tasks.read().await.list().map_err(api_error)?;
    Ok(Json(build_stats(&tasks)))
}
