//! REST routes for notes and users.
//!
//! Both collections expose the same four verbs on a single path, with the
//! record id carried in the JSON body:
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/notes`, `/users` | list |
//! | POST | `/notes`, `/users` | create |
//! | PATCH | `/notes`, `/users` | update |
//! | DELETE | `/notes`, `/users` | delete |

mod body;
mod error;
mod notes;
mod users;

pub use body::JsonBody;
pub use error::ApiError;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::db::Database;
use crate::service::{NoteService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub users: UserService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            notes: NoteService::new(db.clone()),
            users: UserService::new(db),
        }
    }
}

/// The `{"message": ...}` body used for acknowledgements and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/notes",
            get(notes::list)
                .post(notes::create)
                .patch(notes::update)
                .delete(notes::delete),
        )
        .route(
            "/users",
            get(users::list)
                .post(users::create)
                .patch(users::update)
                .delete(users::delete),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(db))
}

async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> (StatusCode, Json<Message>) {
    (StatusCode::NOT_FOUND, Message::new("404 Not Found"))
}
