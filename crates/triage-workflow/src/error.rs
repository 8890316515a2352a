//! Workflow error types.

use thiserror::Error;
use triage_core::error::TriageError;
use triage_core::models::ticket::TicketStatus;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("role is not permitted to {verb}")]
    RoleDenied { verb: &'static str },

    #[error("caller is not the ticket's requester")]
    NotTicketOwner,

    #[error("requesters cannot author internal comments")]
    InternalCommentForbidden,

    #[error("a reason is required to unassign a ticket")]
    UnassignReasonRequired,

    #[error("a non-empty resolution summary is required to complete a ticket")]
    MissingResolutionSummary,

    #[error("comment body must not be empty")]
    EmptyCommentBody,

    #[error("requesters may only file tickets for themselves")]
    RequesterMismatch,

    #[error("no transition from {from:?} to {to:?}")]
    IllegalTransition {
        from: TicketStatus,
        to: TicketStatus,
    },

    #[error("transition from {from:?} to {to:?} requires an assignee")]
    AssigneeRequired {
        from: TicketStatus,
        to: TicketStatus,
    },
}

impl From<WorkflowError> for TriageError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::RoleDenied { .. }
            | WorkflowError::NotTicketOwner
            | WorkflowError::InternalCommentForbidden => TriageError::Forbidden {
                reason: err.to_string(),
            },
            WorkflowError::UnassignReasonRequired
            | WorkflowError::MissingResolutionSummary
            | WorkflowError::EmptyCommentBody
            | WorkflowError::RequesterMismatch => TriageError::Validation {
                message: err.to_string(),
            },
            WorkflowError::IllegalTransition { from, to }
            | WorkflowError::AssigneeRequired { from, to } => {
                TriageError::InvalidTransition { from, to }
            }
        }
    }
}
