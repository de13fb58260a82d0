//! Collaborator contracts consumed by the notification core.
//!
//! The engine and dispatcher only talk to these seams; the concrete
//! Postgres-backed implementations live in `herald-storage`, and the push
//! transport is supplied by the embedding application.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::HeraldError;
use crate::types::{DeviceRegistration, InAppNotification, NotificationKind, Role};

/// Read-only directory of projects, participants and device registrations.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Participant user ids for a project, in stable directory order.
    async fn list_participants(&self, project_id: Uuid) -> Result<Vec<Uuid>, HeraldError>;

    /// All device registrations owned by any of the given users.
    async fn list_device_registrations(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<DeviceRegistration>, HeraldError>;

    /// The user's global notification toggle.
    async fn is_globally_enabled(&self, user_id: Uuid) -> Result<bool, HeraldError>;

    /// The user's role in a project. Non-participants resolve to `Role::Viewer`.
    async fn get_role(&self, user_id: Uuid, project_id: Uuid) -> Result<Role, HeraldError>;

    /// Explicit per-project per-kind preference; `None` means no preference set.
    async fn get_project_preference(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        kind: NotificationKind,
    ) -> Result<Option<bool>, HeraldError>;
}

/// Outbound push transport. Must be safe for many concurrent callers.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        kind: NotificationKind,
        extra: &serde_json::Value,
    ) -> Result<(), HeraldError>;
}

/// Durable store of in-app notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist one record; returns its id.
    async fn create(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        message: &str,
        project_id: Option<Uuid>,
    ) -> Result<Uuid, HeraldError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<InAppNotification>, HeraldError>;

    /// Mark a record read. Returns false if it does not exist or belongs to
    /// another user.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, HeraldError>;

    /// Delete a record. Returns false if nothing was deleted.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, HeraldError>;
}
