//! Role → kind permission matrix.
//!
//! An explicit allow-list per role; any (role, kind) pair not listed is
//! denied. New kinds therefore stay silent for a role until someone adds
//! them to that role's list.

use herald_common::types::{NotificationKind, Role};

use NotificationKind::*;

/// Owners see everything, including membership and invite traffic.
const OWNER_ALLOWED: &[NotificationKind] = &[
    TransactionAdded,
    TransactionUpdated,
    TransactionRemoved,
    BudgetThreshold,
    ProjectEdited,
    ProjectRemoved,
    ProjectArchived,
    ProjectUnarchived,
    ParticipantRoleChanged,
    ParticipantRemoved,
    InviteSent,
    InviteAccepted,
    SystemAlert,
];

/// Editors see content and membership changes, but not outgoing invites.
const EDITOR_ALLOWED: &[NotificationKind] = &[
    TransactionAdded,
    TransactionUpdated,
    TransactionRemoved,
    BudgetThreshold,
    ProjectEdited,
    ProjectRemoved,
    ProjectArchived,
    ProjectUnarchived,
    ParticipantRoleChanged,
    ParticipantRemoved,
    InviteAccepted,
    SystemAlert,
];

/// Viewers only see content and project lifecycle changes.
const VIEWER_ALLOWED: &[NotificationKind] = &[
    TransactionAdded,
    TransactionUpdated,
    TransactionRemoved,
    BudgetThreshold,
    ProjectEdited,
    ProjectRemoved,
    ProjectArchived,
    ProjectUnarchived,
    ParticipantRoleChanged,
    ParticipantRemoved,
    SystemAlert,
];

/// Pure, total (role, kind) → allowed mapping.
pub struct PermissionMatrix;

impl PermissionMatrix {
    pub fn is_allowed(role: Role, kind: NotificationKind) -> bool {
        let allowed = match role {
            Role::Owner => OWNER_ALLOWED,
            Role::Editor => EDITOR_ALLOWED,
            Role::Viewer => VIEWER_ALLOWED,
        };
        allowed.contains(&kind)
    }
}
