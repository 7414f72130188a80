//! HTTP API for technotes.
//!
//! The domain lives in [`technotes_core`]; this crate only maps HTTP requests
//! onto its services and service results onto HTTP responses.

pub mod api;

pub use technotes_core::{db, models, service};
