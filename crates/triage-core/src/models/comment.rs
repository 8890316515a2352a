//! Comment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    /// Internal comments are visible to agents only. A requester can
    /// never author one, and never sees one.
    pub is_internal: bool,
    pub body: String,
    /// References into the external attachment store. The core never
    /// inspects attachment content.
    pub attachment_refs: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub is_internal: bool,
    pub body: String,
    pub attachment_refs: Vec<Uuid>,
}
