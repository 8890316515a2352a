//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    triage_db::run_migrations(&db).await.unwrap();

    // Verify that the tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("ticket"), "missing ticket table");
    assert!(info_str.contains("audit_log"), "missing audit_log table");
    assert!(info_str.contains("comment"), "missing comment table");

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    triage_db::run_migrations(&db).await.unwrap();
    triage_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn audit_log_rejects_unknown_action() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    triage_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE audit_log SET \
             ticket_id = 't', actor_id = 'a', \
             action = 'Vanished', details = '', metadata = {}",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "unknown audit action should be rejected");
}

#[tokio::test]
async fn ticket_rejects_unknown_status() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    triage_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE ticket SET \
             requester_id = 'r', title = 't', description = 'd', \
             ticket_type = 'Incident', category = 'c', subcategory = 's', \
             status = 'Lost', priority = 'Low', priority_level = 1",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "unknown ticket status should be rejected");
}
