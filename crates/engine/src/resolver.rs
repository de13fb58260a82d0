//! Recipient resolver: candidate lookup plus guard filtering.

use std::sync::Arc;

use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::traits::Directory;
use herald_common::types::NotificationKind;

use crate::guard::NotificationGuard;

pub struct RecipientResolver {
    directory: Arc<dyn Directory>,
    guard: NotificationGuard,
}

impl RecipientResolver {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        let guard = NotificationGuard::new(directory.clone());
        Self { directory, guard }
    }

    /// Resolve the eligible recipients for an event.
    ///
    /// - An explicit recipient list bypasses the participant lookup but still
    ///   passes through the guard.
    /// - No project and no explicit list yields an empty set; there is no
    ///   implicit all-users broadcast.
    /// - Directory order is preserved; the result is never re-sorted.
    pub async fn resolve(
        &self,
        kind: NotificationKind,
        project_id: Option<Uuid>,
        explicit: Option<&[Uuid]>,
    ) -> Result<Vec<Uuid>, HeraldError> {
        let candidates: Vec<Uuid> = match (explicit, project_id) {
            (Some(list), _) => list.to_vec(),
            (None, Some(pid)) => self.directory.list_participants(pid).await?,
            (None, None) => return Ok(Vec::new()),
        };

        let mut eligible = Vec::with_capacity(candidates.len());
        for user_id in candidates {
            if self.guard.can_receive(user_id, project_id, kind).await? {
                eligible.push(user_id);
            }
        }

        tracing::debug!(
            kind = %kind,
            eligible = eligible.len(),
            "Recipients resolved"
        );

        Ok(eligible)
    }
}
