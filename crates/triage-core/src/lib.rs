//! Triage Core — domain models, repository traits, and authorization
//! rules shared across all crates.
//!
//! This crate performs no I/O. The workflow engine and the database
//! layer both depend on it; nothing here depends on them.

pub mod authz;
pub mod error;
pub mod models;
pub mod repository;

pub use error::{TriageError, TriageResult};
