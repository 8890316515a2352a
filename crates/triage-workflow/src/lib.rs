//! Triage Workflow — the ticket workflow engine and comment
//! subsystem.
//!
//! The engine is the sole mutator of a ticket's status and assignee,
//! and pairs every successful mutation with one audit entry. Both
//! services are generic over the `triage-core` repository traits and
//! have no dependency on the database crate.

pub mod comments;
pub mod config;
pub mod error;
pub mod service;
pub mod transition;

pub use comments::CommentService;
pub use config::WorkflowConfig;
pub use error::WorkflowError;
pub use service::{AssignTarget, WorkflowService};
