//! Integration tests for the workflow engine.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use triage_core::error::TriageError;
use triage_core::models::actor::{Actor, Role};
use triage_core::models::audit::AuditAction;
use triage_core::models::ticket::{CreateTicket, Priority, TicketStatus, TicketType};
use triage_db::repository::{SurrealAuditLogRepository, SurrealTicketRepository};
use triage_workflow::{AssignTarget, WorkflowConfig, WorkflowService};
use uuid::Uuid;

type Service = WorkflowService<
    SurrealTicketRepository<surrealdb::engine::local::Db>,
    SurrealAuditLogRepository<surrealdb::engine::local::Db>,
>;

/// Spin up in-memory DB, run migrations, build the engine.
async fn setup() -> Service {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    triage_db::run_migrations(&db).await.unwrap();

    WorkflowService::new(
        SurrealTicketRepository::new(db.clone()),
        SurrealAuditLogRepository::new(db),
        WorkflowConfig::default(),
    )
}

fn requester() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Requester)
}

fn agent() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Agent)
}

fn admin() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Admin)
}

fn draft(requester_id: Uuid) -> CreateTicket {
    CreateTicket {
        requester_id,
        title: "Monitor flickers".into(),
        description: "Flickers when the office lights are on.".into(),
        ticket_type: TicketType::Incident,
        category: "Hardware".into(),
        subcategory: "Monitor".into(),
        device: Some("DELL-U2720".into()),
        location: Some("Floor 3".into()),
        priority: Priority::Medium,
    }
}

#[tokio::test]
async fn full_lifecycle_scenario() {
    let svc = setup().await;
    let r = requester();
    let a = agent();

    // Requester files a ticket.
    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Created);
    assert_eq!(ticket.assignee_id, None);

    // Agent self-assigns.
    let ticket = svc
        .assign(a, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Assigned);
    assert_eq!(ticket.assignee_id, Some(a.id));

    let history = svc.get_history(a, ticket.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].action, AuditAction::Created);
    assert_eq!(history[1].action, AuditAction::Assigned);

    // Agent starts work.
    let ticket = svc
        .update_status(a, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Started);
    assert_eq!(svc.get_history(a, ticket.id).await.unwrap().len(), 3);

    // Completing with an empty summary fails and changes nothing.
    let err = svc
        .update_status(a, ticket.id, TicketStatus::Completed, Some("".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::Validation { .. }));

    let history = svc.get_history(a, ticket.id).await.unwrap();
    assert_eq!(history.len(), 3, "failed transition must not be audited");

    // Completing with a summary succeeds.
    let ticket = svc
        .update_status(
            a,
            ticket.id,
            TicketStatus::Completed,
            Some("Replaced cable".into()),
        )
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Completed);
    assert_eq!(ticket.resolution_summary.as_deref(), Some("Replaced cable"));

    let history = svc.get_history(a, ticket.id).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[3].action, AuditAction::StatusChanged);
    assert_eq!(history[3].details, "Started to Completed");
}

#[tokio::test]
async fn create_appends_exactly_one_audit_entry() {
    let svc = setup().await;
    let r = requester();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();

    let history = svc.get_history(r, ticket.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, AuditAction::Created);
    assert_eq!(history[0].actor_id, r.id);
}

#[tokio::test]
async fn requester_cannot_file_for_someone_else() {
    let svc = setup().await;
    let r = requester();

    let err = svc
        .create_ticket(r, draft(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::Validation { .. }));
}

#[tokio::test]
async fn agent_can_file_on_behalf_of_a_requester() {
    let svc = setup().await;
    let a = agent();
    let end_user = Uuid::new_v4();

    let ticket = svc.create_ticket(a, draft(end_user)).await.unwrap();
    assert_eq!(ticket.requester_id, end_user);
}

#[tokio::test]
async fn assign_to_named_agent() {
    let svc = setup().await;
    let r = requester();
    let a = agent();
    let colleague = Uuid::new_v4();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    let ticket = svc
        .assign(a, ticket.id, AssignTarget::Agent(colleague), None)
        .await
        .unwrap();

    assert_eq!(ticket.assignee_id, Some(colleague));
    assert_eq!(ticket.status, TicketStatus::Assigned);
}

#[tokio::test]
async fn requester_cannot_assign() {
    let svc = setup().await;
    let r = requester();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    let err = svc
        .assign(r, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::Forbidden { .. }));
}

#[tokio::test]
async fn admin_holds_agent_verbs() {
    let svc = setup().await;
    let r = requester();
    let adm = admin();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    let ticket = svc
        .assign(adm, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap();
    assert_eq!(ticket.assignee_id, Some(adm.id));

    let ticket = svc
        .update_status(adm, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Started);
}

#[tokio::test]
async fn assign_missing_ticket_is_not_found() {
    let svc = setup().await;
    let a = agent();

    let err = svc
        .assign(a, Uuid::new_v4(), AssignTarget::Myself, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::NotFound { .. }));
}

#[tokio::test]
async fn unassign_requires_a_reason() {
    let svc = setup().await;
    let r = requester();
    let a = agent();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    let ticket = svc
        .assign(a, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap();

    // Empty reason fails.
    let err = svc
        .assign(a, ticket.id, AssignTarget::Unassign, Some("".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::Validation { .. }));

    // A real reason succeeds: assignee cleared, status back to Created.
    let ticket = svc
        .assign(
            a,
            ticket.id,
            AssignTarget::Unassign,
            Some("fixed via phone".into()),
        )
        .await
        .unwrap();
    assert_eq!(ticket.assignee_id, None);
    assert_eq!(ticket.status, TicketStatus::Created);

    let history = svc.get_history(a, ticket.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].action, AuditAction::Unassigned);
    assert_eq!(history[2].details, "fixed via phone");
}

#[tokio::test]
async fn start_requires_an_assignee() {
    let svc = setup().await;
    let r = requester();
    let a = agent();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();

    // Created -> Started is not even a legal edge.
    let err = svc
        .update_status(a, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::InvalidTransition { .. }));

    // Assigned -> OnHold -> unassigned midway would leave OnHold with
    // no assignee; resuming to Started must then fail.
    let ticket = svc
        .assign(a, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap();
    svc.update_status(a, ticket.id, TicketStatus::OnHold, None)
        .await
        .unwrap();
    svc.assign(a, ticket.id, AssignTarget::Unassign, Some("reshuffle".into()))
        .await
        .unwrap();
    svc.update_status(a, ticket.id, TicketStatus::OnHold, None)
        .await
        .unwrap();
    let err = svc
        .update_status(a, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::InvalidTransition { .. }));
}

#[tokio::test]
async fn on_hold_pauses_and_resumes() {
    let svc = setup().await;
    let r = requester();
    let a = agent();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    svc.assign(a, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap();
    svc.update_status(a, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap();

    let ticket = svc
        .update_status(a, ticket.id, TicketStatus::OnHold, None)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::OnHold);
    // Pausing does not steal the assignment.
    assert_eq!(ticket.assignee_id, Some(a.id));

    let ticket = svc
        .update_status(a, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Started);
}

#[tokio::test]
async fn completed_ticket_cannot_be_put_on_hold() {
    let svc = setup().await;
    let r = requester();
    let a = agent();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    svc.assign(a, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap();
    svc.update_status(a, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap();
    svc.update_status(a, ticket.id, TicketStatus::Completed, Some("done".into()))
        .await
        .unwrap();

    let err = svc
        .update_status(a, ticket.id, TicketStatus::OnHold, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::InvalidTransition { .. }));
}

#[tokio::test]
async fn reopen_clears_the_resolution_summary() {
    let svc = setup().await;
    let r = requester();
    let a = agent();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();
    svc.assign(a, ticket.id, AssignTarget::Myself, None)
        .await
        .unwrap();
    svc.update_status(a, ticket.id, TicketStatus::Started, None)
        .await
        .unwrap();
    let ticket = svc
        .update_status(a, ticket.id, TicketStatus::Completed, Some("done".into()))
        .await
        .unwrap();
    assert_eq!(ticket.resolution_summary.as_deref(), Some("done"));

    // Reopen: the summary is non-empty iff the ticket is Completed.
    let ticket = svc
        .update_status(a, ticket.id, TicketStatus::Assigned, None)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Assigned);
    assert_eq!(ticket.resolution_summary, None);
    assert_eq!(ticket.assignee_id, Some(a.id));
}

#[tokio::test]
async fn history_is_owner_gated_for_requesters() {
    let svc = setup().await;
    let r = requester();
    let stranger = requester();
    let a = agent();

    let ticket = svc.create_ticket(r, draft(r.id)).await.unwrap();

    // Owner may read; a different requester may not; agents may.
    assert!(svc.get_history(r, ticket.id).await.is_ok());
    let err = svc.get_history(stranger, ticket.id).await.unwrap_err();
    assert!(matches!(err, TriageError::Forbidden { .. }));
    assert!(svc.get_history(a, ticket.id).await.is_ok());
}

#[tokio::test]
async fn list_my_tickets_sorts_by_priority() {
    let svc = setup().await;
    let r = requester();

    let mut low = draft(r.id);
    low.title = "low".into();
    low.priority = Priority::Low;
    let mut urgent = draft(r.id);
    urgent.title = "urgent".into();
    urgent.priority = Priority::Urgent;

    svc.create_ticket(r, low).await.unwrap();
    svc.create_ticket(r, urgent).await.unwrap();

    let tickets = svc.list_my_tickets(r).await.unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].title, "urgent");
    assert_eq!(tickets[1].title, "low");
}
