//! SurrealDB implementation of [`CommentRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use triage_core::error::TriageResult;
use triage_core::models::comment::{Comment, CreateComment};
use triage_core::repository::{CommentFilter, CommentRepository};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CommentRow {
    ticket_id: String,
    author_id: String,
    is_internal: bool,
    body: String,
    attachment_refs: Vec<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CommentRowWithId {
    record_id: String,
    ticket_id: String,
    author_id: String,
    is_internal: bool,
    body: String,
    attachment_refs: Vec<String>,
    created_at: DateTime<Utc>,
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

impl CommentRow {
    fn into_comment(self, id: Uuid) -> Result<Comment, DbError> {
        let attachment_refs = self
            .attachment_refs
            .iter()
            .map(|s| parse_uuid(s, "attachment"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Comment {
            id,
            ticket_id: parse_uuid(&self.ticket_id, "ticket")?,
            author_id: parse_uuid(&self.author_id, "author")?,
            is_internal: self.is_internal,
            body: self.body,
            attachment_refs,
            created_at: self.created_at,
        })
    }
}

impl CommentRowWithId {
    fn try_into_comment(self) -> Result<Comment, DbError> {
        let id = parse_uuid(&self.record_id, "comment")?;
        CommentRow {
            ticket_id: self.ticket_id,
            author_id: self.author_id,
            is_internal: self.is_internal,
            body: self.body,
            attachment_refs: self.attachment_refs,
            created_at: self.created_at,
        }
        .into_comment(id)
    }
}

/// SurrealDB implementation of the comment repository.
#[derive(Clone)]
pub struct SurrealCommentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCommentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CommentRepository for SurrealCommentRepository<C> {
    async fn create(&self, input: CreateComment) -> TriageResult<Comment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let attachment_refs: Vec<String> = input
            .attachment_refs
            .iter()
            .map(Uuid::to_string)
            .collect();

        let result = self
            .db
            .query(
                "CREATE type::record('comment', $id) SET \
                 ticket_id = $ticket_id, \
                 author_id = $author_id, \
                 is_internal = $is_internal, \
                 body = $body, \
                 attachment_refs = $attachment_refs",
            )
            .bind(("id", id_str.clone()))
            .bind(("ticket_id", input.ticket_id.to_string()))
            .bind(("author_id", input.author_id.to_string()))
            .bind(("is_internal", input.is_internal))
            .bind(("body", input.body))
            .bind(("attachment_refs", attachment_refs))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CommentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "comment".into(),
            id: id_str,
        })?;

        Ok(row.into_comment(id)?)
    }

    async fn list_by_ticket(
        &self,
        ticket_id: Uuid,
        filter: CommentFilter,
    ) -> TriageResult<Vec<Comment>> {
        // The visibility filter runs in the store: internal comments
        // never leave the database for a requester view.
        let query = match filter {
            CommentFilter::All => {
                "SELECT meta::id(id) AS record_id, * FROM comment \
                 WHERE ticket_id = $ticket_id \
                 ORDER BY created_at ASC"
            }
            CommentFilter::ExternalOnly => {
                "SELECT meta::id(id) AS record_id, * FROM comment \
                 WHERE ticket_id = $ticket_id AND is_internal = false \
                 ORDER BY created_at ASC"
            }
        };

        let mut result = self
            .db
            .query(query)
            .bind(("ticket_id", ticket_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommentRowWithId> = result.take(0).map_err(DbError::from)?;

        let comments = rows
            .into_iter()
            .map(|row| row.try_into_comment())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(comments)
    }
}
