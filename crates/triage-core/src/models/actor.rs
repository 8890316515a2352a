//! Actor and role domain model.
//!
//! The identity provider authenticates callers and hands the core an
//! `(id, role)` pair; the core trusts this input and performs no
//! independent authentication.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three roles known to the helpdesk.
///
/// `Admin` is provisioned out-of-band and is not self-registerable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Requester,
    Agent,
    Admin,
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}
