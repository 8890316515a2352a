//! Comment subsystem — role-gated conversation entries on a ticket.
//!
//! Comments never change ticket status, but their creation is kept in
//! the audit trail for completeness. Visibility of internal comments
//! is decided through the same central authorization table as every
//! other verb.

use serde_json::json;
use tracing::warn;
use triage_core::authz::{Ownership, Verb, can_perform};
use triage_core::error::TriageResult;
use triage_core::models::actor::Actor;
use triage_core::models::audit::{AuditAction, CreateAuditEntry};
use triage_core::models::comment::{Comment, CreateComment};
use triage_core::repository::{
    AuditLogRepository, CommentFilter, CommentRepository, TicketRepository,
};
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::service::ownership_of;

/// The comment subsystem.
pub struct CommentService<T, A, C>
where
    T: TicketRepository,
    A: AuditLogRepository,
    C: CommentRepository,
{
    tickets: T,
    audit: A,
    comments: C,
}

impl<T, A, C> CommentService<T, A, C>
where
    T: TicketRepository,
    A: AuditLogRepository,
    C: CommentRepository,
{
    pub fn new(tickets: T, audit: A, comments: C) -> Self {
        Self {
            tickets,
            audit,
            comments,
        }
    }

    /// Attach a comment to a ticket.
    ///
    /// Requesters may only comment on tickets they own, and never
    /// internally — both checks fail before anything is persisted.
    /// Agents may comment on any ticket regardless of assignment.
    pub async fn add_comment(
        &self,
        actor: Actor,
        ticket_id: Uuid,
        body: String,
        is_internal: bool,
        attachment_refs: Vec<Uuid>,
    ) -> TriageResult<Comment> {
        let ticket = self.tickets.get_by_id(ticket_id).await?;
        let ownership = ownership_of(&ticket, actor.id);

        let verb = if is_internal {
            Verb::CommentInternal
        } else {
            Verb::CommentExternal
        };
        if !can_perform(actor.role, verb, ownership) {
            let err = if is_internal && ownership == Ownership::Own {
                WorkflowError::InternalCommentForbidden
            } else {
                WorkflowError::NotTicketOwner
            };
            return Err(err.into());
        }

        if body.trim().is_empty() {
            return Err(WorkflowError::EmptyCommentBody.into());
        }

        let attachment_count = attachment_refs.len();
        let comment = self
            .comments
            .create(CreateComment {
                ticket_id,
                author_id: actor.id,
                is_internal,
                body,
                attachment_refs,
            })
            .await?;

        self.record(CreateAuditEntry {
            ticket_id,
            actor_id: actor.id,
            action: AuditAction::Commented,
            details: if is_internal {
                "internal comment added".into()
            } else {
                "comment added".into()
            },
            metadata: Some(json!({ "comment_id": comment.id })),
        })
        .await;

        if attachment_count > 0 {
            self.record(CreateAuditEntry {
                ticket_id,
                actor_id: actor.id,
                action: AuditAction::AttachmentAdded,
                details: format!("{attachment_count} attachment(s) added"),
                metadata: Some(json!({
                    "comment_id": comment.id,
                    "attachment_count": attachment_count,
                })),
            })
            .await;
        }

        Ok(comment)
    }

    /// The comments on a ticket, oldest first.
    ///
    /// Requesters may only read tickets they own and never see
    /// internal comments — the filter is applied in the store, not by
    /// post-hoc deletion.
    pub async fn get_comments(&self, actor: Actor, ticket_id: Uuid) -> TriageResult<Vec<Comment>> {
        let ticket = self.tickets.get_by_id(ticket_id).await?;
        let ownership = ownership_of(&ticket, actor.id);

        if !can_perform(actor.role, Verb::ViewTicket, ownership) {
            return Err(WorkflowError::NotTicketOwner.into());
        }

        let filter = if can_perform(actor.role, Verb::ViewInternalComments, ownership) {
            CommentFilter::All
        } else {
            CommentFilter::ExternalOnly
        };

        self.comments.list_by_ticket(ticket_id, filter).await
    }

    /// Best-effort audit append: comments are lower-stakes than
    /// workflow transitions, so a failure is logged and swallowed.
    async fn record(&self, entry: CreateAuditEntry) {
        if let Err(err) = self.audit.append(entry).await {
            warn!(error = %err, "audit append failed; comment write stands");
        }
    }
}
