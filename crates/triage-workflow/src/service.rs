//! Ticket workflow engine — the sole mutator of a ticket's status and
//! assignee.
//!
//! Every successful operation performs exactly one ticket write and
//! appends exactly one audit entry. The audit append is best-effort
//! by default: a failure is logged and the ticket write stands (see
//! [`WorkflowConfig::strict_audit`]).

use serde_json::json;
use tracing::warn;
use triage_core::authz::{Ownership, Verb, can_perform};
use triage_core::error::TriageResult;
use triage_core::models::actor::{Actor, Role};
use triage_core::models::audit::{AuditAction, AuditEntry, CreateAuditEntry};
use triage_core::models::ticket::{CreateTicket, Ticket, TicketStatus};
use triage_core::repository::{AuditLogRepository, TicketRepository};
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::transition;

/// Who a ticket should be assigned to.
///
/// Models the source API's single nullable argument: an explicit
/// agent, "assign to myself" shorthand, or unassign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTarget {
    Agent(Uuid),
    Myself,
    Unassign,
}

/// The ticket workflow engine.
///
/// Generic over repository implementations so the engine has no
/// dependency on the database crate.
pub struct WorkflowService<T: TicketRepository, A: AuditLogRepository> {
    tickets: T,
    audit: A,
    config: WorkflowConfig,
}

impl<T: TicketRepository, A: AuditLogRepository> WorkflowService<T, A> {
    pub fn new(tickets: T, audit: A, config: WorkflowConfig) -> Self {
        Self {
            tickets,
            audit,
            config,
        }
    }

    /// File a new ticket. Any authenticated actor may do this; a
    /// requester may only file for themselves.
    ///
    /// The ticket starts as `Created` with no assignee. Appends one
    /// `Created` audit entry.
    pub async fn create_ticket(&self, actor: Actor, input: CreateTicket) -> TriageResult<Ticket> {
        if !can_perform(actor.role, Verb::CreateTicket, Ownership::Own) {
            return Err(WorkflowError::RoleDenied {
                verb: "create tickets",
            }
            .into());
        }
        if actor.role == Role::Requester && input.requester_id != actor.id {
            return Err(WorkflowError::RequesterMismatch.into());
        }

        let ticket = self.tickets.create(input).await?;

        self.record(CreateAuditEntry {
            ticket_id: ticket.id,
            actor_id: actor.id,
            action: AuditAction::Created,
            details: format!("ticket '{}' created", ticket.title),
            metadata: None,
        })
        .await?;

        Ok(ticket)
    }

    /// Assign, self-assign, or unassign a ticket. Agents and admins
    /// only.
    ///
    /// Assignment forces the status to `Assigned` from wherever the
    /// ticket was; unassignment requires a reason and forces the
    /// status back to `Created`. Either way the resolution summary is
    /// cleared, since the ticket is no longer `Completed`.
    pub async fn assign(
        &self,
        actor: Actor,
        ticket_id: Uuid,
        target: AssignTarget,
        reason: Option<String>,
    ) -> TriageResult<Ticket> {
        if !can_perform(actor.role, Verb::Assign, Ownership::Other) {
            return Err(WorkflowError::RoleDenied {
                verb: "assign tickets",
            }
            .into());
        }

        let mut ticket = self.tickets.get_by_id(ticket_id).await?;

        let entry = match target {
            AssignTarget::Unassign => {
                let reason = reason
                    .filter(|r| !r.trim().is_empty())
                    .ok_or(WorkflowError::UnassignReasonRequired)?;

                ticket.assignee_id = None;
                ticket.status = TicketStatus::Created;
                ticket.resolution_summary = None;

                CreateAuditEntry {
                    ticket_id,
                    actor_id: actor.id,
                    action: AuditAction::Unassigned,
                    details: reason,
                    metadata: None,
                }
            }
            AssignTarget::Agent(_) | AssignTarget::Myself => {
                let assignee = match target {
                    AssignTarget::Agent(id) => id,
                    _ => actor.id,
                };

                ticket.assignee_id = Some(assignee);
                ticket.status = TicketStatus::Assigned;
                ticket.resolution_summary = None;

                CreateAuditEntry {
                    ticket_id,
                    actor_id: actor.id,
                    action: AuditAction::Assigned,
                    details: format!("assigned to {assignee}"),
                    metadata: Some(json!({ "assignee_id": assignee })),
                }
            }
        };

        let ticket = self.tickets.save_workflow_state(&ticket).await?;
        self.record(entry).await?;

        Ok(ticket)
    }

    /// Move a ticket to a new status. Agents and admins only.
    ///
    /// Legality is decided by the transition table; on top of it,
    /// `Started`/`Assigned` require an assignee and `Completed`
    /// additionally requires a non-empty resolution summary. On a
    /// failed check the ticket is left untouched and nothing is
    /// appended to the audit log.
    pub async fn update_status(
        &self,
        actor: Actor,
        ticket_id: Uuid,
        new_status: TicketStatus,
        resolution_summary: Option<String>,
    ) -> TriageResult<Ticket> {
        if !can_perform(actor.role, Verb::ChangeStatus, Ownership::Other) {
            return Err(WorkflowError::RoleDenied {
                verb: "change ticket status",
            }
            .into());
        }

        let mut ticket = self.tickets.get_by_id(ticket_id).await?;
        let old_status = ticket.status;

        if !transition::is_legal(old_status, new_status) {
            return Err(WorkflowError::IllegalTransition {
                from: old_status,
                to: new_status,
            }
            .into());
        }

        // An in-progress or completed ticket always has an owner.
        let needs_assignee = matches!(
            new_status,
            TicketStatus::Assigned | TicketStatus::Started | TicketStatus::Completed
        );
        if needs_assignee && ticket.assignee_id.is_none() {
            return Err(WorkflowError::AssigneeRequired {
                from: old_status,
                to: new_status,
            }
            .into());
        }

        if new_status == TicketStatus::Completed {
            let summary = resolution_summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(WorkflowError::MissingResolutionSummary)?;
            ticket.resolution_summary = Some(summary.to_string());
        } else {
            // Leaving Completed (reopen) or staying short of it: the
            // summary is non-empty iff the ticket is Completed.
            ticket.resolution_summary = None;
        }
        ticket.status = new_status;

        let ticket = self.tickets.save_workflow_state(&ticket).await?;

        self.record(CreateAuditEntry {
            ticket_id,
            actor_id: actor.id,
            action: AuditAction::StatusChanged,
            details: format!("{} to {}", old_status.as_str(), new_status.as_str()),
            metadata: None,
        })
        .await?;

        Ok(ticket)
    }

    /// The full audit history of a ticket, oldest first.
    ///
    /// Requesters may only read the history of tickets they own;
    /// agents and admins may read any.
    pub async fn get_history(&self, actor: Actor, ticket_id: Uuid) -> TriageResult<Vec<AuditEntry>> {
        let ticket = self.tickets.get_by_id(ticket_id).await?;
        let ownership = ownership_of(&ticket, actor.id);

        if !can_perform(actor.role, Verb::ViewHistory, ownership) {
            return Err(WorkflowError::NotTicketOwner.into());
        }

        self.audit.list_by_ticket(ticket_id).await
    }

    /// All tickets the caller has filed, most urgent first.
    pub async fn list_my_tickets(&self, actor: Actor) -> TriageResult<Vec<Ticket>> {
        self.tickets.list_by_requester(actor.id).await
    }

    /// Append an audit entry, tolerating failure unless strict mode
    /// is on. The preceding ticket write is never rolled back.
    async fn record(&self, entry: CreateAuditEntry) -> TriageResult<()> {
        match self.audit.append(entry).await {
            Ok(_) => Ok(()),
            Err(err) if self.config.strict_audit => Err(err),
            Err(err) => {
                warn!(error = %err, "audit append failed; ticket write stands");
                Ok(())
            }
        }
    }
}

/// Whether `actor_id` is the ticket's requester.
pub(crate) fn ownership_of(ticket: &Ticket, actor_id: Uuid) -> Ownership {
    if ticket.requester_id == actor_id {
        Ownership::Own
    } else {
        Ownership::Other
    }
}
