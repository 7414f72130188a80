//! Note and user use-cases.
//!
//! Each operation parses its request body into an explicit input type before
//! touching the store, then runs its existence and uniqueness checks in a
//! fixed order. Failures are reported as [`ServiceError`] values whose
//! `Display` output is the message shown to API clients.

mod notes;
mod users;

pub use notes::NoteService;
pub use users::{UserService, PASSWORD_COST};

use crate::db::StoreError;
use crate::models::InvalidFields;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed fields, a violated business rule, or a record
    /// the store refused.
    #[error("{0}")]
    InvalidInput(&'static str),
    /// The addressed record does not exist, or a listing came back empty.
    #[error("{0}")]
    NotFound(&'static str),
    /// A unique field collides with another record.
    #[error("{0}")]
    Conflict(&'static str),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn invalid_input(invalid: InvalidFields, message: &'static str) -> ServiceError {
    tracing::debug!("Rejected request body ({}): {}", invalid, message);
    ServiceError::InvalidInput(message)
}

/// Translates a failed write. Unique violations that slipped past the
/// pre-check become conflicts; other constraint failures become bad input.
fn write_failure(err: StoreError, conflict: &'static str, rejected: &'static str) -> ServiceError {
    match err {
        StoreError::Duplicate(detail) => {
            tracing::warn!("Store rejected duplicate: {}", detail);
            ServiceError::Conflict(conflict)
        }
        StoreError::Rejected(detail) => {
            tracing::warn!("Store rejected record: {}", detail);
            ServiceError::InvalidInput(rejected)
        }
        other => ServiceError::Store(other),
    }
}
