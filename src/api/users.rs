use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiError, AppState, JsonBody, Message};
use crate::models::User;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list()?))
}

// Create and update hash passwords, so they run off the async workers.

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let users = state.users.clone();
    let user = tokio::task::spawn_blocking(move || users.create(&body)).await??;
    Ok((
        StatusCode::CREATED,
        Message::new(format!("New user {} created", user.username)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Message>, ApiError> {
    let users = state.users.clone();
    let user = tokio::task::spawn_blocking(move || users.update(&body)).await??;
    Ok(Message::new(format!("{} updated", user.username)))
}

pub async fn delete(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<String>, ApiError> {
    let user = state.users.delete(&body)?;
    Ok(Json(format!("{} with ID {} deleted", user.username, user.id)))
}
