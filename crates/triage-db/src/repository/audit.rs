//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! The `audit_log` table is append-only: the schema forbids update
//! and delete, and this repository exposes neither.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use triage_core::error::TriageResult;
use triage_core::models::audit::{AuditAction, AuditEntry, CreateAuditEntry};
use triage_core::repository::AuditLogRepository;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AuditRow {
    ticket_id: String,
    actor_id: String,
    action: String,
    details: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    ticket_id: String,
    actor_id: String,
    action: String,
    details: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

fn parse_action(s: &str) -> Result<AuditAction, DbError> {
    match s {
        "Created" => Ok(AuditAction::Created),
        "Assigned" => Ok(AuditAction::Assigned),
        "Unassigned" => Ok(AuditAction::Unassigned),
        "StatusChanged" => Ok(AuditAction::StatusChanged),
        "Commented" => Ok(AuditAction::Commented),
        "AttachmentAdded" => Ok(AuditAction::AttachmentAdded),
        other => Err(DbError::Corrupt(format!("unknown audit action: {other}"))),
    }
}

fn action_to_string(a: AuditAction) -> &'static str {
    match a {
        AuditAction::Created => "Created",
        AuditAction::Assigned => "Assigned",
        AuditAction::Unassigned => "Unassigned",
        AuditAction::StatusChanged => "StatusChanged",
        AuditAction::Commented => "Commented",
        AuditAction::AttachmentAdded => "AttachmentAdded",
    }
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

impl AuditRow {
    fn into_entry(self, id: Uuid) -> Result<AuditEntry, DbError> {
        Ok(AuditEntry {
            id,
            ticket_id: parse_uuid(&self.ticket_id, "ticket")?,
            actor_id: parse_uuid(&self.actor_id, "actor")?,
            action: parse_action(&self.action)?,
            details: self.details,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}

impl AuditRowWithId {
    fn try_into_entry(self) -> Result<AuditEntry, DbError> {
        let id = parse_uuid(&self.record_id, "audit entry")?;
        AuditRow {
            ticket_id: self.ticket_id,
            actor_id: self.actor_id,
            action: self.action,
            details: self.details,
            metadata: self.metadata,
            created_at: self.created_at,
        }
        .into_entry(id)
    }
}

/// SurrealDB implementation of the audit log repository.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditEntry) -> TriageResult<AuditEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 ticket_id = $ticket_id, \
                 actor_id = $actor_id, \
                 action = $action, \
                 details = $details, \
                 metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("ticket_id", input.ticket_id.to_string()))
            .bind(("actor_id", input.actor_id.to_string()))
            .bind(("action", action_to_string(input.action).to_string()))
            .bind(("details", input.details))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn list_by_ticket(&self, ticket_id: Uuid) -> TriageResult<Vec<AuditEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM audit_log \
                 WHERE ticket_id = $ticket_id \
                 ORDER BY created_at ASC",
            )
            .bind(("ticket_id", ticket_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;

        let entries = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(entries)
    }
}
