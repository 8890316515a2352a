//! The legal status transition table.
//!
//! `assign`/`unassign` move tickets between `Created` and `Assigned`
//! through their own code path; this table governs `update_status`
//! only. `Created` is therefore never a valid target here, and the
//! current status is never a valid target either.

use triage_core::models::ticket::TicketStatus;

/// Whether `update_status` may move a ticket from `from` to `to`.
///
/// - `OnHold` is reachable from any non-terminal state.
/// - `OnHold` resumes to `Assigned` or `Started`.
/// - `Completed → Assigned` is the explicit Reopen exception to
///   terminality.
pub fn is_legal(from: TicketStatus, to: TicketStatus) -> bool {
    use TicketStatus::*;
    matches!(
        (from, to),
        (Created, OnHold)
            | (Assigned, Started | OnHold)
            | (Started, Completed | OnHold)
            | (OnHold, Assigned | Started)
            | (Completed, Assigned)
    )
}
