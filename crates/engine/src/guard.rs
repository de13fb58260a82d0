//! Notification guard: per-(user, project, kind) eligibility checks.
//!
//! Composes the global toggle, the permission matrix and the per-project
//! preference into a single decision, cheapest check first. A directory
//! failure propagates as an error so callers can tell infrastructure trouble
//! apart from a deliberate denial.

use std::sync::Arc;

use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::traits::Directory;
use herald_common::types::{NotificationKind, Role};

use crate::permissions::PermissionMatrix;

pub struct NotificationGuard {
    directory: Arc<dyn Directory>,
}

impl NotificationGuard {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    /// Whether a user may be notified about `kind` in the given project scope.
    ///
    /// Check order:
    /// 1. Global notification toggle off → deny
    /// 2. Permission matrix for the user's role (no project → `Viewer`) → deny
    /// 3. Explicit per-project preference excluding this kind → deny
    ///    (an absent preference defaults to allow)
    pub async fn can_receive(
        &self,
        user_id: Uuid,
        project_id: Option<Uuid>,
        kind: NotificationKind,
    ) -> Result<bool, HeraldError> {
        if !self.directory.is_globally_enabled(user_id).await? {
            return Ok(false);
        }

        let role = match project_id {
            Some(pid) => self.directory.get_role(user_id, pid).await?,
            None => Role::Viewer,
        };
        if !PermissionMatrix::is_allowed(role, kind) {
            tracing::debug!(
                user_id = %user_id,
                role = %role,
                kind = %kind,
                "Notification denied by permission matrix"
            );
            return Ok(false);
        }

        if let Some(pid) = project_id
            && let Some(enabled) = self
                .directory
                .get_project_preference(user_id, pid, kind)
                .await?
            && !enabled
        {
            return Ok(false);
        }

        Ok(true)
    }
}
