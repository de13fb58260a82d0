//! Guard + resolver tests against an in-memory directory.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::traits::Directory;
use herald_common::types::{DeviceRegistration, NotificationKind, Role};
use herald_engine::guard::NotificationGuard;
use herald_engine::resolver::RecipientResolver;

// ============================================================
// Shared helpers
// ============================================================

#[derive(Default)]
struct StaticDirectory {
    participants: Vec<Uuid>,
    globally_disabled: HashSet<Uuid>,
    roles: HashMap<Uuid, Role>,
    preferences: HashMap<(Uuid, NotificationKind), bool>,
    unreachable: bool,
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn list_participants(&self, _project_id: Uuid) -> Result<Vec<Uuid>, HeraldError> {
        if self.unreachable {
            return Err(HeraldError::Directory("unreachable".to_string()));
        }
        Ok(self.participants.clone())
    }

    async fn list_device_registrations(
        &self,
        _user_ids: &[Uuid],
    ) -> Result<Vec<DeviceRegistration>, HeraldError> {
        Ok(Vec::new())
    }

    async fn is_globally_enabled(&self, user_id: Uuid) -> Result<bool, HeraldError> {
        if self.unreachable {
            return Err(HeraldError::Directory("unreachable".to_string()));
        }
        Ok(!self.globally_disabled.contains(&user_id))
    }

    async fn get_role(&self, user_id: Uuid, _project_id: Uuid) -> Result<Role, HeraldError> {
        Ok(*self.roles.get(&user_id).unwrap_or(&Role::Viewer))
    }

    async fn get_project_preference(
        &self,
        user_id: Uuid,
        _project_id: Uuid,
        kind: NotificationKind,
    ) -> Result<Option<bool>, HeraldError> {
        Ok(self.preferences.get(&(user_id, kind)).copied())
    }
}

fn directory_with(users: &[(Uuid, Role)]) -> StaticDirectory {
    StaticDirectory {
        participants: users.iter().map(|(id, _)| *id).collect(),
        roles: users.iter().copied().collect(),
        ..Default::default()
    }
}

// ============================================================
// NotificationGuard
// ============================================================

#[tokio::test]
async fn test_guard_global_toggle_off_denies() {
    let user = Uuid::new_v4();
    let project = Uuid::new_v4();
    let mut dir = directory_with(&[(user, Role::Owner)]);
    dir.globally_disabled.insert(user);

    let guard = NotificationGuard::new(Arc::new(dir));
    let allowed = guard
        .can_receive(user, Some(project), NotificationKind::TransactionAdded)
        .await
        .unwrap();
    assert!(!allowed);
}

#[tokio::test]
async fn test_guard_matrix_denies_by_role() {
    let user = Uuid::new_v4();
    let project = Uuid::new_v4();
    let dir = directory_with(&[(user, Role::Viewer)]);

    let guard = NotificationGuard::new(Arc::new(dir));
    assert!(
        !guard
            .can_receive(user, Some(project), NotificationKind::InviteSent)
            .await
            .unwrap()
    );
    assert!(
        guard
            .can_receive(user, Some(project), NotificationKind::TransactionAdded)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_guard_no_project_treated_as_viewer() {
    let user = Uuid::new_v4();
    // Role map says Owner, but without a project the guard assumes Viewer.
    let dir = directory_with(&[(user, Role::Owner)]);

    let guard = NotificationGuard::new(Arc::new(dir));
    assert!(
        !guard
            .can_receive(user, None, NotificationKind::InviteSent)
            .await
            .unwrap()
    );
    assert!(
        guard
            .can_receive(user, None, NotificationKind::SystemAlert)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_guard_preference_opt_out() {
    let user = Uuid::new_v4();
    let project = Uuid::new_v4();
    let mut dir = directory_with(&[(user, Role::Editor)]);
    dir.preferences
        .insert((user, NotificationKind::TransactionAdded), false);

    let guard = NotificationGuard::new(Arc::new(dir));
    assert!(
        !guard
            .can_receive(user, Some(project), NotificationKind::TransactionAdded)
            .await
            .unwrap()
    );
    // No preference record for this kind → default allow.
    assert!(
        guard
            .can_receive(user, Some(project), NotificationKind::TransactionUpdated)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_guard_directory_failure_is_error_not_denial() {
    let user = Uuid::new_v4();
    let project = Uuid::new_v4();
    let dir = StaticDirectory {
        unreachable: true,
        ..Default::default()
    };

    let guard = NotificationGuard::new(Arc::new(dir));
    let result = guard
        .can_receive(user, Some(project), NotificationKind::TransactionAdded)
        .await;
    assert!(matches!(result, Err(HeraldError::Directory(_))));
}

// ============================================================
// RecipientResolver
// ============================================================

#[tokio::test]
async fn test_resolver_no_project_no_explicit_is_empty() {
    let dir = directory_with(&[(Uuid::new_v4(), Role::Owner)]);
    let resolver = RecipientResolver::new(Arc::new(dir));

    let recipients = resolver
        .resolve(NotificationKind::TransactionAdded, None, None)
        .await
        .unwrap();
    assert!(recipients.is_empty());
}

#[tokio::test]
async fn test_resolver_empty_participant_list_is_empty() {
    let resolver = RecipientResolver::new(Arc::new(StaticDirectory::default()));

    let recipients = resolver
        .resolve(
            NotificationKind::TransactionAdded,
            Some(Uuid::new_v4()),
            None,
        )
        .await
        .unwrap();
    assert!(recipients.is_empty());
}

#[tokio::test]
async fn test_resolver_preserves_directory_order() {
    let users: Vec<(Uuid, Role)> = (0..4).map(|_| (Uuid::new_v4(), Role::Editor)).collect();
    let dir = directory_with(&users);
    let resolver = RecipientResolver::new(Arc::new(dir));

    let recipients = resolver
        .resolve(
            NotificationKind::TransactionAdded,
            Some(Uuid::new_v4()),
            None,
        )
        .await
        .unwrap();
    let expected: Vec<Uuid> = users.iter().map(|(id, _)| *id).collect();
    assert_eq!(recipients, expected);
}

#[tokio::test]
async fn test_resolver_filters_through_guard() {
    let owner = Uuid::new_v4();
    let viewer = Uuid::new_v4();
    let project = Uuid::new_v4();
    let dir = directory_with(&[(owner, Role::Owner), (viewer, Role::Viewer)]);
    let resolver = RecipientResolver::new(Arc::new(dir));

    // Viewers are not permitted invite_sent; only the owner survives.
    let recipients = resolver
        .resolve(NotificationKind::InviteSent, Some(project), None)
        .await
        .unwrap();
    assert_eq!(recipients, vec![owner]);
}

#[tokio::test]
async fn test_resolver_explicit_recipients_still_guarded() {
    let enabled = Uuid::new_v4();
    let disabled = Uuid::new_v4();
    let project = Uuid::new_v4();
    let mut dir = directory_with(&[(enabled, Role::Editor), (disabled, Role::Editor)]);
    dir.globally_disabled.insert(disabled);
    // Explicit list bypasses the participant lookup entirely.
    dir.participants.clear();
    let resolver = RecipientResolver::new(Arc::new(dir));

    let recipients = resolver
        .resolve(
            NotificationKind::TransactionAdded,
            Some(project),
            Some(&[enabled, disabled]),
        )
        .await
        .unwrap();
    assert_eq!(recipients, vec![enabled]);
}
