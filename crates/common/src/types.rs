use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories of notification events the system can dispatch.
///
/// The `Display` form doubles as the template-key prefix
/// (e.g. `transaction_added.body`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum NotificationKind {
    // Transaction events
    TransactionAdded,
    TransactionUpdated,
    TransactionRemoved,

    // Budget events
    BudgetThreshold,

    // Project lifecycle events
    ProjectEdited,
    ProjectRemoved,
    ProjectArchived,
    ProjectUnarchived,

    // Membership events
    ParticipantRoleChanged,
    ParticipantRemoved,
    InviteSent,
    InviteAccepted,

    // System
    SystemAlert,
}

impl NotificationKind {
    /// Every kind, for totality checks and catalog validation.
    pub const ALL: &'static [NotificationKind] = &[
        NotificationKind::TransactionAdded,
        NotificationKind::TransactionUpdated,
        NotificationKind::TransactionRemoved,
        NotificationKind::BudgetThreshold,
        NotificationKind::ProjectEdited,
        NotificationKind::ProjectRemoved,
        NotificationKind::ProjectArchived,
        NotificationKind::ProjectUnarchived,
        NotificationKind::ParticipantRoleChanged,
        NotificationKind::ParticipantRemoved,
        NotificationKind::InviteSent,
        NotificationKind::InviteAccepted,
        NotificationKind::SystemAlert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TransactionAdded => "transaction_added",
            NotificationKind::TransactionUpdated => "transaction_updated",
            NotificationKind::TransactionRemoved => "transaction_removed",
            NotificationKind::BudgetThreshold => "budget_threshold",
            NotificationKind::ProjectEdited => "project_edited",
            NotificationKind::ProjectRemoved => "project_removed",
            NotificationKind::ProjectArchived => "project_archived",
            NotificationKind::ProjectUnarchived => "project_unarchived",
            NotificationKind::ParticipantRoleChanged => "participant_role_changed",
            NotificationKind::ParticipantRemoved => "participant_removed",
            NotificationKind::InviteSent => "invite_sent",
            NotificationKind::InviteAccepted => "invite_accepted",
            NotificationKind::SystemAlert => "system_alert",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A participant's role within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Role {
    Owner,
    Editor,
    Viewer,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::Owner, Role::Editor, Role::Viewer];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Editor => write!(f, "editor"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

/// Event context handed to the dispatch pipeline by business operations.
///
/// All fields are optional; a missing field means the derived template
/// parameter is simply omitted, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationContext {
    /// User who triggered the event, if any.
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub transaction_id: Option<Uuid>,
    pub transaction_name: Option<String>,
    /// Project spend before the event, in the project currency.
    pub before_spent: Option<f64>,
    /// Project spend after the event.
    pub after_spent: Option<f64>,
    pub budget_limit: Option<f64>,
    /// Free-text details (e.g. the new role for role-change events).
    pub details: Option<String>,
    /// Free-text message for system alerts.
    pub system_message: Option<String>,
}

/// A registered push target. A token belongs to at most one user;
/// re-registering a token moves it (upsert, never append).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceRegistration {
    pub token: String,
    /// Language code the device wants messages in (e.g. "en", "de").
    pub language: String,
    pub user_id: Uuid,
}

/// A user that survived guard filtering for a given dispatch. Derived, not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleRecipient {
    pub user_id: Uuid,
    /// Whether this recipient is also the actor who triggered the event.
    pub is_self: bool,
}

/// Rendered title/body after fallback resolution and parameter substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedMessage {
    pub title: String,
    pub body: String,
}

/// A persisted in-app notification record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InAppNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_keys_are_distinct() {
        let mut keys: Vec<&str> = NotificationKind::ALL.iter().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), NotificationKind::ALL.len());
    }

    #[test]
    fn test_kind_display_matches_as_str() {
        for kind in NotificationKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
