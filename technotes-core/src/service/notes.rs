use std::collections::BTreeSet;

use super::{invalid_input, write_failure, ServiceError, ServiceResult};
use crate::db::Database;
use crate::models::{CreateNoteInput, DeleteInput, Note, NoteWithOwner, RequestBody, UpdateNoteInput};

const NO_NOTES: &str = "No notes found";
const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const DUPLICATE_TITLE: &str = "Duplicate note title";
const INVALID_NOTE_DATA: &str = "Invalid note data received";
const NOTE_NOT_FOUND: &str = "Note not found";
const NOTE_ID_REQUIRED: &str = "Note ID required";

#[derive(Clone)]
pub struct NoteService {
    db: Database,
}

impl NoteService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every note with its owner's username. An empty collection is an error.
    pub fn list(&self) -> ServiceResult<Vec<NoteWithOwner>> {
        let notes = self.db.all_notes()?;
        if notes.is_empty() {
            return Err(ServiceError::NotFound(NO_NOTES));
        }

        let usernames = {
            let owners: BTreeSet<&str> = notes.iter().map(|n| n.user.as_str()).collect();
            let owners: Vec<&str> = owners.into_iter().collect();
            self.db.usernames_for(&owners)?
        };

        Ok(notes
            .into_iter()
            .map(|note| {
                let username = usernames.get(&note.user).cloned();
                if username.is_none() {
                    tracing::warn!("Note {} references missing user {}", note.id, note.user);
                }
                NoteWithOwner { note, username }
            })
            .collect())
    }

    pub fn create(&self, body: &RequestBody) -> ServiceResult<Note> {
        let input = CreateNoteInput::parse(body)
            .map_err(|invalid| invalid_input(invalid, ALL_FIELDS_REQUIRED))?;

        if self.db.find_note_by_title(&input.title)?.is_some() {
            tracing::debug!("Note title {:?} already taken", input.title);
            return Err(ServiceError::Conflict(DUPLICATE_TITLE));
        }

        let note = self
            .db
            .insert_note(&input)
            .map_err(|e| write_failure(e, DUPLICATE_TITLE, INVALID_NOTE_DATA))?;
        tracing::info!("Created note {} for user {}", note.id, note.user);
        Ok(note)
    }

    /// Replaces all fields of an existing note. Keeping a note's own title
    /// (in any case) is not a conflict.
    pub fn update(&self, body: &RequestBody) -> ServiceResult<Note> {
        let input = UpdateNoteInput::parse(body)
            .map_err(|invalid| invalid_input(invalid, ALL_FIELDS_REQUIRED))?;

        let mut note = self
            .db
            .get_note(&input.id)?
            .ok_or(ServiceError::NotFound(NOTE_NOT_FOUND))?;

        if let Some(duplicate) = self.db.find_note_by_title(&input.title)? {
            if duplicate.id != input.id {
                tracing::debug!("Note title {:?} already taken by {}", input.title, duplicate.id);
                return Err(ServiceError::Conflict(DUPLICATE_TITLE));
            }
        }

        note.user = input.user;
        note.title = input.title;
        note.text = input.text;
        note.completed = input.completed;

        let saved = self
            .db
            .save_note(&mut note)
            .map_err(|e| write_failure(e, DUPLICATE_TITLE, ALL_FIELDS_REQUIRED))?;
        if !saved {
            return Err(ServiceError::NotFound(NOTE_NOT_FOUND));
        }

        tracing::info!("Updated note {}", note.id);
        Ok(note)
    }

    /// Deletes a single note and returns it as it was.
    pub fn delete(&self, body: &RequestBody) -> ServiceResult<Note> {
        let DeleteInput { id } =
            DeleteInput::parse(body).map_err(|invalid| invalid_input(invalid, NOTE_ID_REQUIRED))?;

        let note = self
            .db
            .get_note(&id)?
            .ok_or(ServiceError::NotFound(NOTE_NOT_FOUND))?;

        if !self.db.delete_note(&note.id)? {
            return Err(ServiceError::NotFound(NOTE_NOT_FOUND));
        }

        tracing::info!("Deleted note {}", note.id);
        Ok(note)
    }
}
