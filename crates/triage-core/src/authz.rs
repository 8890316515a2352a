//! Centralized authorization rules.
//!
//! Every operation consults [`can_perform`] before mutating anything.
//! Roles and verbs are closed enumerations so that adding either
//! requires exactly one change site, instead of per-handler role
//! string comparisons.

use crate::models::actor::Role;

/// The verbs the helpdesk exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    CreateTicket,
    ViewTicket,
    Assign,
    ChangeStatus,
    CommentExternal,
    CommentInternal,
    ViewInternalComments,
    ViewHistory,
}

/// Whether the acting caller is the ticket's requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Own,
    Other,
}

/// The single authorization decision point.
///
/// Admin holds every verb an Agent holds. Requesters act only on
/// tickets they own and never touch internal comments.
pub fn can_perform(role: Role, verb: Verb, ownership: Ownership) -> bool {
    match (role, verb) {
        // Any authenticated actor may file a ticket.
        (_, Verb::CreateTicket) => true,

        // Agents and admins may do anything with any ticket.
        (Role::Agent | Role::Admin, _) => true,

        // Requesters are limited to their own tickets, external view.
        (Role::Requester, Verb::ViewTicket | Verb::ViewHistory | Verb::CommentExternal) => {
            ownership == Ownership::Own
        }
        (
            Role::Requester,
            Verb::Assign | Verb::ChangeStatus | Verb::CommentInternal | Verb::ViewInternalComments,
        ) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyone_can_create_tickets() {
        for role in [Role::Requester, Role::Agent, Role::Admin] {
            assert!(can_perform(role, Verb::CreateTicket, Ownership::Other));
        }
    }

    #[test]
    fn requester_is_scoped_to_own_tickets() {
        assert!(can_perform(Role::Requester, Verb::ViewTicket, Ownership::Own));
        assert!(!can_perform(
            Role::Requester,
            Verb::ViewTicket,
            Ownership::Other
        ));
        assert!(can_perform(
            Role::Requester,
            Verb::ViewHistory,
            Ownership::Own
        ));
        assert!(!can_perform(
            Role::Requester,
            Verb::ViewHistory,
            Ownership::Other
        ));
    }

    #[test]
    fn requester_never_touches_internal_comments() {
        for ownership in [Ownership::Own, Ownership::Other] {
            assert!(!can_perform(Role::Requester, Verb::CommentInternal, ownership));
            assert!(!can_perform(
                Role::Requester,
                Verb::ViewInternalComments,
                ownership
            ));
        }
    }

    #[test]
    fn requester_cannot_drive_the_workflow() {
        assert!(!can_perform(Role::Requester, Verb::Assign, Ownership::Own));
        assert!(!can_perform(
            Role::Requester,
            Verb::ChangeStatus,
            Ownership::Own
        ));
    }

    #[test]
    fn admin_holds_every_agent_verb() {
        for verb in [
            Verb::ViewTicket,
            Verb::Assign,
            Verb::ChangeStatus,
            Verb::CommentExternal,
            Verb::CommentInternal,
            Verb::ViewInternalComments,
            Verb::ViewHistory,
        ] {
            assert!(can_perform(Role::Agent, verb, Ownership::Other));
            assert!(can_perform(Role::Admin, verb, Ownership::Other));
        }
    }
}
