//! SurrealDB repository implementations.

mod audit;
mod comment;
mod ticket;

pub use audit::SurrealAuditLogRepository;
pub use comment::SurrealCommentRepository;
pub use ticket::SurrealTicketRepository;
