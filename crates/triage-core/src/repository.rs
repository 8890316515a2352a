//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The workflow engine is generic
//! over these traits and has no dependency on the database crate.

use uuid::Uuid;

use crate::error::TriageResult;
use crate::models::{
    audit::{AuditEntry, CreateAuditEntry},
    comment::{Comment, CreateComment},
    ticket::{CreateTicket, Ticket},
};

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

pub trait TicketRepository: Send + Sync {
    /// Persist a new ticket. Status, assignee, resolution summary,
    /// and the derived priority level are decided by the workflow
    /// engine before this is called.
    fn create(&self, input: CreateTicket) -> impl Future<Output = TriageResult<Ticket>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TriageResult<Ticket>> + Send;

    /// Persist the mutable workflow fields of a ticket: status,
    /// assignee, resolution summary. Bumps `updated_at`.
    fn save_workflow_state(
        &self,
        ticket: &Ticket,
    ) -> impl Future<Output = TriageResult<Ticket>> + Send;

    /// All tickets filed by a requester, most urgent first
    /// (`priority_level` descending).
    fn list_by_requester(
        &self,
        requester_id: Uuid,
    ) -> impl Future<Output = TriageResult<Vec<Ticket>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit log (append-only)
// ---------------------------------------------------------------------------

pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit entry. No update or delete operations exist.
    fn append(
        &self,
        input: CreateAuditEntry,
    ) -> impl Future<Output = TriageResult<AuditEntry>> + Send;

    /// All entries for a ticket, `created_at` ascending. This ordering
    /// is the canonical history view.
    fn list_by_ticket(
        &self,
        ticket_id: Uuid,
    ) -> impl Future<Output = TriageResult<Vec<AuditEntry>>> + Send;
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Visibility filter applied when listing comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentFilter {
    /// Every comment, internal included (agent view).
    All,
    /// Only comments with `is_internal == false` (requester view).
    ExternalOnly,
}

pub trait CommentRepository: Send + Sync {
    fn create(&self, input: CreateComment) -> impl Future<Output = TriageResult<Comment>> + Send;

    /// Comments for a ticket, `created_at` ascending, with the
    /// visibility filter applied in the store.
    fn list_by_ticket(
        &self,
        ticket_id: Uuid,
        filter: CommentFilter,
    ) -> impl Future<Output = TriageResult<Vec<Comment>>> + Send;
}
