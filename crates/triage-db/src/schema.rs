//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. The audit log is append-only
//! at the schema level: its table forbids update and delete.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tickets
-- =======================================================================
DEFINE TABLE ticket SCHEMAFULL;
DEFINE FIELD requester_id ON TABLE ticket TYPE string;
DEFINE FIELD title ON TABLE ticket TYPE string;
DEFINE FIELD description ON TABLE ticket TYPE string;
DEFINE FIELD ticket_type ON TABLE ticket TYPE string \
    ASSERT $value IN ['Incident', 'ServiceRequest'];
DEFINE FIELD category ON TABLE ticket TYPE string;
DEFINE FIELD subcategory ON TABLE ticket TYPE string;
DEFINE FIELD device ON TABLE ticket TYPE option<string>;
DEFINE FIELD location ON TABLE ticket TYPE option<string>;
DEFINE FIELD status ON TABLE ticket TYPE string \
    ASSERT $value IN ['Created', 'Assigned', 'Started', 'OnHold', \
    'Completed'];
DEFINE FIELD priority ON TABLE ticket TYPE string \
    ASSERT $value IN ['Low', 'Medium', 'High', 'Urgent'];
DEFINE FIELD priority_level ON TABLE ticket TYPE int;
DEFINE FIELD assignee_id ON TABLE ticket TYPE option<string>;
DEFINE FIELD resolution_summary ON TABLE ticket TYPE option<string>;
DEFINE FIELD created_at ON TABLE ticket TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE ticket TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_ticket_requester ON TABLE ticket \
    COLUMNS requester_id;

-- =======================================================================
-- Audit Log (append-only)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD ticket_id ON TABLE audit_log TYPE string;
DEFINE FIELD actor_id ON TABLE audit_log TYPE string;
DEFINE FIELD action ON TABLE audit_log TYPE string \
    ASSERT $value IN ['Created', 'Assigned', 'Unassigned', \
    'StatusChanged', 'Commented', 'AttachmentAdded'];
DEFINE FIELD details ON TABLE audit_log TYPE string;
DEFINE FIELD metadata ON TABLE audit_log TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_ticket_time ON TABLE audit_log \
    COLUMNS ticket_id, created_at;

-- =======================================================================
-- Comments
-- =======================================================================
DEFINE TABLE comment SCHEMAFULL;
DEFINE FIELD ticket_id ON TABLE comment TYPE string;
DEFINE FIELD author_id ON TABLE comment TYPE string;
DEFINE FIELD is_internal ON TABLE comment TYPE bool DEFAULT false;
DEFINE FIELD body ON TABLE comment TYPE string;
DEFINE FIELD attachment_refs ON TABLE comment TYPE array DEFAULT [];
DEFINE FIELD attachment_refs.* ON TABLE comment TYPE string;
DEFINE FIELD created_at ON TABLE comment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_comment_ticket_time ON TABLE comment \
    COLUMNS ticket_id, created_at;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
