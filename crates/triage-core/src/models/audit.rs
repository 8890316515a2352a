//! Audit log domain model.
//!
//! Entries are append-only: no update or delete exists anywhere in
//! the system. Ordering by `created_at` ascending is the canonical
//! history view for a ticket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The state-changing action an audit entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditAction {
    Created,
    Assigned,
    Unassigned,
    StatusChanged,
    Commented,
    AttachmentAdded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub actor_id: Uuid,
    pub action: AuditAction,
    /// Free-text details, e.g. `"Started to Completed"`.
    pub details: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    pub ticket_id: Uuid,
    pub actor_id: Uuid,
    pub action: AuditAction,
    pub details: String,
    pub metadata: Option<serde_json::Value>,
}
