use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiError, AppState, JsonBody, Message};
use crate::models::NoteWithOwner;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<NoteWithOwner>>, ApiError> {
    Ok(Json(state.notes.list()?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    state.notes.create(&body)?;
    Ok((StatusCode::CREATED, Message::new("New note created")))
}

pub async fn update(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<String>, ApiError> {
    let note = state.notes.update(&body)?;
    Ok(Json(format!("'{}' updated", note.title)))
}

pub async fn delete(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Message>, ApiError> {
    let note = state.notes.delete(&body)?;
    Ok(Message::new(format!(
        "Note {} with ID {} deleted",
        note.title, note.id
    )))
}
