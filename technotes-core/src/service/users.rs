use super::{invalid_input, write_failure, ServiceError, ServiceResult};
use crate::db::Database;
use crate::models::{CreateUserInput, DeleteInput, NewUser, RequestBody, UpdateUserInput, User};

/// bcrypt cost used for every stored password.
pub const PASSWORD_COST: u32 = 10;

const NO_USERS: &str = "No users found";
const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const ALL_BUT_PASSWORD_REQUIRED: &str = "All fields except password is required";
const DUPLICATE_USERNAME: &str = "Duplicate username";
const INVALID_USER_DATA: &str = "Invalid user data received";
const USER_NOT_FOUND: &str = "User not found";
const USER_NOT_FOUND_ON_UPDATE: &str = "User not found!";
const USER_ID_REQUIRED: &str = "User ID required";
const USER_HAS_NOTES: &str = "User has assigned notes";

#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every user, without password hashes. An empty collection is an error.
    pub fn list(&self) -> ServiceResult<Vec<User>> {
        let users = self.db.all_users()?;
        if users.is_empty() {
            return Err(ServiceError::NotFound(NO_USERS));
        }
        Ok(users)
    }

    pub fn create(&self, body: &RequestBody) -> ServiceResult<User> {
        let input = CreateUserInput::parse(body)
            .map_err(|invalid| invalid_input(invalid, ALL_FIELDS_REQUIRED))?;

        if self.db.find_user_by_username(&input.username)?.is_some() {
            tracing::debug!("Username {:?} already taken", input.username);
            return Err(ServiceError::Conflict(DUPLICATE_USERNAME));
        }

        let new_user = NewUser {
            password_hash: bcrypt::hash(&input.password, PASSWORD_COST)?,
            username: input.username,
            roles: input.roles,
        };

        let user = self
            .db
            .insert_user(&new_user)
            .map_err(|e| write_failure(e, DUPLICATE_USERNAME, INVALID_USER_DATA))?;
        tracing::info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Replaces username, roles and active flag. The password is rehashed
    /// only when a new one is supplied.
    pub fn update(&self, body: &RequestBody) -> ServiceResult<User> {
        let input = UpdateUserInput::parse(body)
            .map_err(|invalid| invalid_input(invalid, ALL_BUT_PASSWORD_REQUIRED))?;

        let mut user = self
            .db
            .get_user(&input.id)?
            .ok_or(ServiceError::NotFound(USER_NOT_FOUND_ON_UPDATE))?;

        if let Some(duplicate) = self.db.find_user_by_username(&input.username)? {
            if duplicate.id != input.id {
                tracing::debug!("Username {:?} already taken by {}", input.username, duplicate.id);
                return Err(ServiceError::Conflict(DUPLICATE_USERNAME));
            }
        }

        user.username = input.username;
        user.roles = input.roles;
        user.active = input.active;

        let password_hash = input
            .password
            .map(|password| bcrypt::hash(password, PASSWORD_COST))
            .transpose()?;

        let saved = self
            .db
            .save_user(&mut user, password_hash.as_deref())
            .map_err(|e| write_failure(e, DUPLICATE_USERNAME, ALL_BUT_PASSWORD_REQUIRED))?;
        if !saved {
            return Err(ServiceError::NotFound(USER_NOT_FOUND_ON_UPDATE));
        }

        tracing::info!(
            "Updated user {} ({}){}",
            user.username,
            user.id,
            if password_hash.is_some() { " with new password" } else { "" }
        );
        Ok(user)
    }

    /// Deletes a user that owns no notes.
    ///
    /// The note check runs before the existence check, so an id referenced
    /// by any note is refused even when no such user exists.
    pub fn delete(&self, body: &RequestBody) -> ServiceResult<User> {
        let DeleteInput { id } =
            DeleteInput::parse(body).map_err(|invalid| invalid_input(invalid, USER_ID_REQUIRED))?;

        if let Some(note) = self.db.find_note_by_user(&id)? {
            tracing::debug!("User {} still owns note {}", id, note.id);
            return Err(ServiceError::InvalidInput(USER_HAS_NOTES));
        }

        let user = self
            .db
            .get_user(&id)?
            .ok_or(ServiceError::NotFound(USER_NOT_FOUND))?;

        if !self.db.delete_user(&user.id)? {
            return Err(ServiceError::NotFound(USER_NOT_FOUND));
        }

        tracing::info!("Deleted user {} ({})", user.username, user.id);
        Ok(user)
    }
}
