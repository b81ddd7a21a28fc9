use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use taskmate_core::patch::is_blank;
use taskmate_core::wikilinks::extract_wiki_links;
use taskmate_core::{NewNote, Note, NotePatch};

use super::{api_error, bad_request, not_found, ApiJson, ApiResult};
use crate::state::AppState;

const NOTE_NOT_FOUND: &str = "Note not found";

pub async fn list_notes(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Note>>> {
    let mut notes = state.notes.read().await.list().map_err(api_error)?;
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(Json(notes))
}

pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let note = state.notes.read().await.require(&id).map_err(api_error)?;
    Ok(Json(note))
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewNote>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    if is_blank(body.title.as_deref()) {
        return Err(bad_request("Title is required"));
    }
    let note = Note::from_new(body, Utc::now());
    state.notes.write().await.save(&note).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NotePatch>,
) -> ApiResult<Json<Note>> {
    if patch.title.is_some() && is_blank(patch.title.as_deref()) {
        return Err(bad_request("Title cannot be empty"));
    }
    let store = state.notes.write().await;
    let mut note = store.require(&id).map_err(api_error)?;
    note.apply_patch(patch, Utc::now());
    store.save(&note).map_err(api_error)?;
    Ok(Json(note))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if state.notes.write().await.delete(&id).map_err(api_error)? {
        Ok(Json(MessageResponse {
            message: "Note deleted successfully",
        }))
    } else {
        Err(not_found(NOTE_NOT_FOUND))
    }
}

// ── Wikilinks ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveLinksRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLink {
    pub title: String,
    pub note_id: Option<String>,
}

/// Resolve every `[[Title]]` in `content` to the id of the note with that
/// title (case-insensitive), in order of appearance.
pub async fn resolve_links(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ResolveLinksRequest>,
) -> ApiResult<Json<Vec<ResolvedLink>>> {
    let titles = extract_wiki_links(&body.content);
    if titles.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let notes = state.notes.read().await.list().map_err(api_error)?;
    let resolved = titles
        .into_iter()
        .map(|title| {
            let lowered = title.to_lowercase();
            let note_id = notes
                .iter()
                .find(|n| n.title.to_lowercase() == lowered)
                .map(|n| n.id.clone());
            ResolvedLink { title, note_id }
        })
        .collect();
    Ok(Json(resolved))
}
