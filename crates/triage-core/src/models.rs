//! Domain models for the triage helpdesk.
//!
//! These are the core types shared across all crates.

pub mod actor;
pub mod audit;
pub mod comment;
pub mod ticket;
