//! Core library for technotes.
//!
//! This crate provides the domain models, the SQLite-backed document store and
//! the note/user services, independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use technotes_core::db::Database;
//! use technotes_core::service::NoteService;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let notes = NoteService::new(db).list()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod models;
pub mod service;

// Re-export commonly used types at crate root
pub use db::Database;
pub use service::{NoteService, ServiceError, UserService};
