use std::collections::HashMap;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use uuid::Uuid;

use super::{fold_key, Database, StoreError, StoreResult};
use crate::models::{NewUser, User, DEFAULT_ROLES};

// The password column is deliberately absent.
const USER_COLUMNS: &str = "id, username, roles, active, created_at, updated_at";

/// Ids bound per `IN (...)` lookup.
const LOOKUP_CHUNK: usize = 500;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let roles: String = row.get(2)?;
    let roles = serde_json::from_str(&roles)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        roles,
        active: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn roles_json(roles: &[String]) -> StoreResult<String> {
    serde_json::to_string(roles).map_err(|e| StoreError::Rejected(e.to_string()))
}

impl Database {
    /// All users, oldest first, without password hashes.
    pub fn all_users(&self) -> StoreResult<Vec<User>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
            ))?;
            let users = stmt.query_map([], user_from_row)?;
            users.collect()
        })
    }

    pub fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()
        })
    }

    /// Finds the user whose username equals `username`, ignoring case.
    pub fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username_key = ?1"),
                params![fold_key(username)],
                user_from_row,
            )
            .optional()
        })
    }

    /// Resolves usernames for a batch of user ids, `LOOKUP_CHUNK` ids per
    /// query so large batches stay under SQLite's bound-parameter limit.
    ///
    /// Ids with no matching user are absent from the returned map.
    pub fn usernames_for(&self, ids: &[&str]) -> StoreResult<HashMap<String, String>> {
        let mut usernames = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(LOOKUP_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let found: Vec<(String, String)> = self.with_connection(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT id, username FROM users WHERE id IN ({placeholders})"
                ))?;
                let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;
                rows.collect()
            })?;
            usernames.extend(found);
        }
        Ok(usernames)
    }

    pub fn insert_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let roles = new_user
            .roles
            .clone()
            .unwrap_or_else(|| DEFAULT_ROLES.iter().map(|r| r.to_string()).collect());
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username.clone(),
            roles,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let roles = roles_json(&user.roles)?;

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, username_key, password, roles, active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    user.id,
                    user.username,
                    fold_key(&user.username),
                    new_user.password_hash,
                    roles,
                    user.active,
                    user.created_at,
                    user.updated_at,
                ],
            )
        })?;

        Ok(user)
    }

    /// Overwrites username, roles and active flag, and bumps `updated_at`.
    ///
    /// The stored password hash is replaced only when `password_hash` is
    /// given. Returns `false` if the user no longer exists.
    pub fn save_user(&self, user: &mut User, password_hash: Option<&str>) -> StoreResult<bool> {
        user.updated_at = Utc::now();
        let roles = roles_json(&user.roles)?;

        let changed = self.with_connection(|conn| {
            conn.execute(
                "UPDATE users
                 SET username = ?2, username_key = ?3, roles = ?4, active = ?5, updated_at = ?6,
                     password = COALESCE(?7, password)
                 WHERE id = ?1",
                params![
                    user.id,
                    user.username,
                    fold_key(&user.username),
                    roles,
                    user.active,
                    user.updated_at,
                    password_hash,
                ],
            )
        })?;
        Ok(changed > 0)
    }

    pub fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let deleted =
            self.with_connection(|conn| conn.execute("DELETE FROM users WHERE id = ?1", params![id]))?;
        Ok(deleted > 0)
    }
}
