//! Error type for the persistence layer.

use triage_core::error::TriageError;

/// Errors raised by the SurrealDB persistence layer.
///
/// `Corrupt` marks a stored value the row decoders cannot map back
/// onto a domain type. The schema ASSERTs make this unreachable for
/// rows written through this crate.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Corrupt stored record: {0}")]
    Corrupt(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for TriageError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => TriageError::NotFound { entity, id },
            other => TriageError::Infrastructure(other.to_string()),
        }
    }
}
