//! Ticket domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow state of a ticket.
///
/// The linear path is `Created → Assigned → Started → Completed`.
/// `OnHold` is reachable from any non-terminal state. `Completed` is
/// terminal except for the explicit Reopen transition back to
/// `Assigned`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketStatus {
    Created,
    Assigned,
    Started,
    OnHold,
    Completed,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Created => "Created",
            TicketStatus::Assigned => "Assigned",
            TicketStatus::Started => "Started",
            TicketStatus::OnHold => "OnHold",
            TicketStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketType {
    Incident,
    ServiceRequest,
}

/// Ticket priority as chosen by the requester at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Numeric level used purely for sort ordering (higher = more
    /// urgent). Computed at write time by the workflow engine, never
    /// derived inside the storage layer.
    pub fn level(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    /// The requester who filed the ticket. Immutable.
    pub requester_id: Uuid,
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
    pub category: String,
    pub subcategory: String,
    /// Optional device/location metadata captured at creation.
    pub device: Option<String>,
    pub location: Option<String>,
    pub status: TicketStatus,
    pub priority: Priority,
    /// Derived from `priority`; used only for sort ordering.
    pub priority_level: u8,
    /// The agent currently responsible. Unset while `Created`.
    pub assignee_id: Option<Uuid>,
    /// Non-empty if and only if `status == Completed`.
    pub resolution_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicket {
    pub requester_id: Uuid,
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
    pub category: String,
    pub subcategory: String,
    pub device: Option<String>,
    pub location: Option<String>,
    pub priority: Priority,
}
