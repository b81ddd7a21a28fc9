use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use taskmate_core::patch::is_blank;
use taskmate_core::{NewProject, Project, ProjectPatch};

use super::{api_error, bad_request, not_found, ApiJson, ApiResult};
use crate::state::AppState;

const PROJECT_NOT_FOUND: &str = "Project not found";

pub async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Project>>> {
    let mut projects = state.projects.read().await.list().map_err(api_error)?;
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.read().await.require(&id).map_err(api_error)?;
    Ok(Json(project))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    if is_blank(body.title.as_deref()) {
        return Err(bad_request("Title is required"));
    }
    let project = Project::from_new(body, Utc::now());
    state.projects.write().await.save(&project).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> ApiResult<Json<Project>> {
    if patch.title.is_some() && is_blank(patch.title.as_deref()) {
        return Err(bad_request("Title cannot be empty"));
    }
    let store = state.projects.write().await;
    let mut project = store.require(&id).map_err(api_error)?;
    project.apply_patch(patch, Utc::now());
    store.save(&project).map_err(api_error)?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.projects.write().await.delete(&id).map_err(api_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(PROJECT_NOT_FOUND))
    }
}
