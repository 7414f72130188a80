use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::{InvalidFields, RequestBody, Tags};

/// Roles given to a user created without any.
pub const DEFAULT_ROLES: &[&str] = &["Employee"];

/// A user as exposed by the store.
///
/// The password hash is never loaded into this type; it is only written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user ready to be inserted, with the password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    /// `None` applies [`DEFAULT_ROLES`].
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub roles: Option<Vec<String>>,
}

impl CreateUserInput {
    pub fn parse(body: &RequestBody) -> Result<Self, InvalidFields> {
        let mut invalid = InvalidFields::default();
        let username = invalid.check("username", body.text("username"));
        let password = invalid.check("password", body.text("password"));
        let roles = match body.tags("roles") {
            Tags::Missing => None,
            Tags::Valid(roles) => Some(roles),
            Tags::Malformed => {
                invalid.mark("roles");
                None
            }
        };

        match (username, password) {
            (Some(username), Some(password)) if invalid.is_empty() => Ok(Self {
                username,
                password,
                roles,
            }),
            _ => Err(invalid),
        }
    }
}

/// Wholesale replacement of a user's fields. The password is only replaced
/// when a new one is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserInput {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub password: Option<String>,
}

impl UpdateUserInput {
    pub fn parse(body: &RequestBody) -> Result<Self, InvalidFields> {
        let mut invalid = InvalidFields::default();
        let id = invalid.check("id", body.text("id"));
        let username = invalid.check("username", body.text("username"));
        let roles = match body.tags("roles") {
            Tags::Valid(roles) => Some(roles),
            Tags::Missing | Tags::Malformed => None,
        };
        let roles = invalid.check("roles", roles);
        let active = invalid.check("active", body.flag("active"));

        match (id, username, roles, active) {
            (Some(id), Some(username), Some(roles), Some(active)) => Ok(Self {
                id,
                username,
                roles,
                active,
                password: body.text("password"),
            }),
            _ => Err(invalid),
        }
    }
}
