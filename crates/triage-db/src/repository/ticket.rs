//! SurrealDB implementation of [`TicketRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use triage_core::error::TriageResult;
use triage_core::models::ticket::{CreateTicket, Priority, Ticket, TicketStatus, TicketType};
use triage_core::repository::TicketRepository;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TicketRow {
    requester_id: String,
    title: String,
    description: String,
    ticket_type: String,
    category: String,
    subcategory: String,
    device: Option<String>,
    location: Option<String>,
    status: String,
    priority: String,
    assignee_id: Option<String>,
    resolution_summary: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TicketRowWithId {
    record_id: String,
    requester_id: String,
    title: String,
    description: String,
    ticket_type: String,
    category: String,
    subcategory: String,
    device: Option<String>,
    location: Option<String>,
    status: String,
    priority: String,
    assignee_id: Option<String>,
    resolution_summary: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<TicketStatus, DbError> {
    match s {
        "Created" => Ok(TicketStatus::Created),
        "Assigned" => Ok(TicketStatus::Assigned),
        "Started" => Ok(TicketStatus::Started),
        "OnHold" => Ok(TicketStatus::OnHold),
        "Completed" => Ok(TicketStatus::Completed),
        other => Err(DbError::Corrupt(format!("unknown ticket status: {other}"))),
    }
}

fn parse_type(s: &str) -> Result<TicketType, DbError> {
    match s {
        "Incident" => Ok(TicketType::Incident),
        "ServiceRequest" => Ok(TicketType::ServiceRequest),
        other => Err(DbError::Corrupt(format!("unknown ticket type: {other}"))),
    }
}

fn type_to_string(t: TicketType) -> &'static str {
    match t {
        TicketType::Incident => "Incident",
        TicketType::ServiceRequest => "ServiceRequest",
    }
}

fn parse_priority(s: &str) -> Result<Priority, DbError> {
    match s {
        "Low" => Ok(Priority::Low),
        "Medium" => Ok(Priority::Medium),
        "High" => Ok(Priority::High),
        "Urgent" => Ok(Priority::Urgent),
        other => Err(DbError::Corrupt(format!("unknown priority: {other}"))),
    }
}

fn priority_to_string(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
        Priority::Urgent => "Urgent",
    }
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

impl TicketRow {
    fn into_ticket(self, id: Uuid) -> Result<Ticket, DbError> {
        let requester_id = parse_uuid(&self.requester_id, "requester")?;
        let assignee_id = self
            .assignee_id
            .as_deref()
            .map(|s| parse_uuid(s, "assignee"))
            .transpose()?;
        let priority = parse_priority(&self.priority)?;
        Ok(Ticket {
            id,
            requester_id,
            title: self.title,
            description: self.description,
            ticket_type: parse_type(&self.ticket_type)?,
            category: self.category,
            subcategory: self.subcategory,
            device: self.device,
            location: self.location,
            status: parse_status(&self.status)?,
            priority,
            // Recomputed from the pure derivation; the stored copy
            // exists only for ORDER BY.
            priority_level: priority.level(),
            assignee_id,
            resolution_summary: self.resolution_summary,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TicketRowWithId {
    fn try_into_ticket(self) -> Result<Ticket, DbError> {
        let id = parse_uuid(&self.record_id, "ticket")?;
        TicketRow {
            requester_id: self.requester_id,
            title: self.title,
            description: self.description,
            ticket_type: self.ticket_type,
            category: self.category,
            subcategory: self.subcategory,
            device: self.device,
            location: self.location,
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            resolution_summary: self.resolution_summary,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_ticket(id)
    }
}

/// SurrealDB implementation of the Ticket repository.
#[derive(Clone)]
pub struct SurrealTicketRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTicketRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TicketRepository for SurrealTicketRepository<C> {
    async fn create(&self, input: CreateTicket) -> TriageResult<Ticket> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('ticket', $id) SET \
                 requester_id = $requester_id, \
                 title = $title, description = $description, \
                 ticket_type = $ticket_type, \
                 category = $category, subcategory = $subcategory, \
                 device = $device, location = $location, \
                 status = 'Created', \
                 priority = $priority, \
                 priority_level = $priority_level, \
                 assignee_id = NONE, \
                 resolution_summary = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("requester_id", input.requester_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("ticket_type", type_to_string(input.ticket_type).to_string()))
            .bind(("category", input.category))
            .bind(("subcategory", input.subcategory))
            .bind(("device", input.device))
            .bind(("location", input.location))
            .bind(("priority", priority_to_string(input.priority).to_string()))
            .bind(("priority_level", u32::from(input.priority.level())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TicketRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ticket".into(),
            id: id_str,
        })?;

        Ok(row.into_ticket(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> TriageResult<Ticket> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('ticket', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TicketRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ticket".into(),
            id: id_str,
        })?;

        Ok(row.into_ticket(id)?)
    }

    async fn save_workflow_state(&self, ticket: &Ticket) -> TriageResult<Ticket> {
        let id_str = ticket.id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('ticket', $id) SET \
                 status = $status, \
                 assignee_id = $assignee_id, \
                 resolution_summary = $resolution_summary, \
                 priority = $priority, \
                 priority_level = $priority_level, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", ticket.status.as_str().to_string()))
            .bind(("assignee_id", ticket.assignee_id.map(|a| a.to_string())))
            .bind(("resolution_summary", ticket.resolution_summary.clone()))
            .bind(("priority", priority_to_string(ticket.priority).to_string()))
            .bind(("priority_level", u32::from(ticket.priority.level())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TicketRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ticket".into(),
            id: id_str,
        })?;

        Ok(row.into_ticket(ticket.id)?)
    }

    async fn list_by_requester(&self, requester_id: Uuid) -> TriageResult<Vec<Ticket>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM ticket \
                 WHERE requester_id = $requester_id \
                 ORDER BY priority_level DESC, created_at ASC",
            )
            .bind(("requester_id", requester_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TicketRowWithId> = result.take(0).map_err(DbError::from)?;

        let tickets = rows
            .into_iter()
            .map(|row| row.try_into_ticket())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(tickets)
    }
}
