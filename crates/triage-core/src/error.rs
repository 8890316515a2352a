//! Error types for the triage system.

use thiserror::Error;

use crate::models::ticket::TicketStatus;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Invalid transition: {from:?} to {to:?}")]
    InvalidTransition {
        from: TicketStatus,
        to: TicketStatus,
    },

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

pub type TriageResult<T> = Result<T, TriageError>;
