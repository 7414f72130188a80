use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{fold_key, Database, StoreResult};
use crate::models::{CreateNoteInput, Note};

const NOTE_COLUMNS: &str = "id, user, title, text, completed, created_at, updated_at";

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        user: row.get(1)?,
        title: row.get(2)?,
        text: row.get(3)?,
        completed: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl Database {
    /// All notes, oldest first.
    pub fn all_notes(&self) -> StoreResult<Vec<Note>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at, id"
            ))?;
            let notes = stmt.query_map([], note_from_row)?;
            notes.collect()
        })
    }

    pub fn get_note(&self, id: &str) -> StoreResult<Option<Note>> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                params![id],
                note_from_row,
            )
            .optional()
        })
    }

    /// Finds the note whose title equals `title`, ignoring case.
    pub fn find_note_by_title(&self, title: &str) -> StoreResult<Option<Note>> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE title_key = ?1"),
                params![fold_key(title)],
                note_from_row,
            )
            .optional()
        })
    }

    /// Any one note owned by `user_id`.
    pub fn find_note_by_user(&self, user_id: &str) -> StoreResult<Option<Note>> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE user = ?1 LIMIT 1"),
                params![user_id],
                note_from_row,
            )
            .optional()
        })
    }

    pub fn insert_note(&self, input: &CreateNoteInput) -> StoreResult<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            user: input.user.clone(),
            title: input.title.clone(),
            text: input.text.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO notes (id, user, title, title_key, text, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    note.id,
                    note.user,
                    note.title,
                    fold_key(&note.title),
                    note.text,
                    note.completed,
                    note.created_at,
                    note.updated_at,
                ],
            )
        })?;

        Ok(note)
    }

    /// Overwrites every field of the stored note and bumps `updated_at`.
    /// Returns `false` if the note no longer exists.
    pub fn save_note(&self, note: &mut Note) -> StoreResult<bool> {
        note.updated_at = Utc::now();
        let changed = self.with_connection(|conn| {
            conn.execute(
                "UPDATE notes
                 SET user = ?2, title = ?3, title_key = ?4, text = ?5, completed = ?6, updated_at = ?7
                 WHERE id = ?1",
                params![
                    note.id,
                    note.user,
                    note.title,
                    fold_key(&note.title),
                    note.text,
                    note.completed,
                    note.updated_at,
                ],
            )
        })?;
        Ok(changed > 0)
    }

    pub fn delete_note(&self, id: &str) -> StoreResult<bool> {
        let deleted =
            self.with_connection(|conn| conn.execute("DELETE FROM notes WHERE id = ?1", params![id]))?;
        Ok(deleted > 0)
    }
}
