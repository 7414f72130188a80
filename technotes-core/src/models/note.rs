use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::{InvalidFields, RequestBody};

/// A note owned by a user.
///
/// Titles are unique across all notes, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    /// Identifier of the owning user. Not checked against the users table.
    pub user: String,
    pub title: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A note as returned by the listing, with its owner's username attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteWithOwner {
    #[serde(flatten)]
    pub note: Note,
    /// `None` when the owning user no longer exists.
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNoteInput {
    pub user: String,
    pub title: String,
    pub text: String,
}

impl CreateNoteInput {
    pub fn parse(body: &RequestBody) -> Result<Self, InvalidFields> {
        let mut invalid = InvalidFields::default();
        let user = invalid.check("user", body.text("user"));
        let title = invalid.check("title", body.text("title"));
        let text = invalid.check("text", body.text("text"));

        match (user, title, text) {
            (Some(user), Some(title), Some(text)) => Ok(Self { user, title, text }),
            _ => Err(invalid),
        }
    }
}

/// Wholesale replacement of a note's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNoteInput {
    pub id: String,
    pub user: String,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

impl UpdateNoteInput {
    pub fn parse(body: &RequestBody) -> Result<Self, InvalidFields> {
        let mut invalid = InvalidFields::default();
        let id = invalid.check("id", body.text("id"));
        let user = invalid.check("user", body.text("user"));
        let title = invalid.check("title", body.text("title"));
        let text = invalid.check("text", body.text("text"));
        let completed = invalid.check("completed", body.flag("completed"));

        match (id, user, title, text, completed) {
            (Some(id), Some(user), Some(title), Some(text), Some(completed)) => Ok(Self {
                id,
                user,
                title,
                text,
                completed,
            }),
            _ => Err(invalid),
        }
    }
}
