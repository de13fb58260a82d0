//! One-shot notification fan-out.
//!
//! Each dispatch call:
//! 1. Resolves eligible recipients (guard-filtered participant set)
//! 2. Fetches their device registrations
//! 3. Pushes to every device concurrently, bounded by a semaphore; a failure
//!    on one device never affects any other device or recipient
//! 4. Writes exactly one in-app record per eligible recipient, independent of
//!    push outcomes
//!
//! The actor never receives a push for their own action but still gets the
//! in-app record.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::traits::{Directory, NotificationStore, PushDelivery};
use herald_common::types::{
    DeviceRegistration, EligibleRecipient, NotificationContext, NotificationKind,
};
use herald_engine::catalog::TemplateCatalog;
use herald_engine::resolver::RecipientResolver;

/// Summary of a single dispatch call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub recipients: usize,
    pub pushes_sent: usize,
    pub pushes_failed: usize,
    pub records_written: usize,
}

pub struct Dispatcher {
    directory: Arc<dyn Directory>,
    push: Arc<dyn PushDelivery>,
    store: Arc<dyn NotificationStore>,
    resolver: RecipientResolver,
    catalog: Arc<TemplateCatalog>,
    push_permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(
        directory: Arc<dyn Directory>,
        push: Arc<dyn PushDelivery>,
        store: Arc<dyn NotificationStore>,
        catalog: TemplateCatalog,
        push_concurrency: usize,
    ) -> Self {
        let resolver = RecipientResolver::new(directory.clone());
        Self {
            directory,
            push,
            store,
            resolver,
            catalog: Arc::new(catalog),
            push_permits: Arc::new(Semaphore::new(push_concurrency.max(1))),
        }
    }

    /// Run one fan-out for an event.
    ///
    /// Returns an error only when recipient resolution or the registration
    /// lookup fails; per-device and per-record failures are logged and counted,
    /// never propagated.
    pub async fn dispatch(
        &self,
        kind: NotificationKind,
        context: &NotificationContext,
        explicit_recipients: Option<&[Uuid]>,
    ) -> Result<DispatchOutcome, HeraldError> {
        let user_ids = self
            .resolver
            .resolve(kind, context.project_id, explicit_recipients)
            .await?;
        if user_ids.is_empty() {
            tracing::debug!(kind = %kind, "No eligible recipients");
            return Ok(DispatchOutcome::default());
        }

        let recipients: Vec<EligibleRecipient> = user_ids
            .iter()
            .map(|&user_id| EligibleRecipient {
                user_id,
                is_self: context.actor_id == Some(user_id),
            })
            .collect();

        let registrations = self.directory.list_device_registrations(&user_ids).await?;
        let mut by_user: HashMap<Uuid, Vec<DeviceRegistration>> = HashMap::new();
        for reg in registrations {
            by_user.entry(reg.user_id).or_default().push(reg);
        }

        let extra = push_extra(context);
        let mut tasks: JoinSet<bool> = JoinSet::new();
        for recipient in &recipients {
            // Self-suppression: the actor still gets the in-app record below.
            if recipient.is_self {
                continue;
            }
            for reg in by_user.get(&recipient.user_id).into_iter().flatten() {
                let permits = self.push_permits.clone();
                let push = self.push.clone();
                let catalog = self.catalog.clone();
                let context = context.clone();
                let extra = extra.clone();
                let reg = reg.clone();
                tasks.spawn(async move {
                    let Ok(_permit) = permits.acquire_owned().await else {
                        return false;
                    };
                    let message = catalog.localize(kind, &context, &reg.language, false);
                    match push
                        .send(&reg.token, &message.title, &message.body, kind, &extra)
                        .await
                    {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!(
                                user_id = %reg.user_id,
                                kind = %kind,
                                error = %e,
                                "Push delivery failed"
                            );
                            false
                        }
                    }
                });
            }
        }

        let mut pushes_sent = 0usize;
        let mut pushes_failed = 0usize;
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(true) => pushes_sent += 1,
                Ok(false) => pushes_failed += 1,
                Err(e) => {
                    tracing::warn!(kind = %kind, error = %e, "Push task panicked");
                    pushes_failed += 1;
                }
            }
        }

        // One in-app record per recipient, regardless of push outcomes. The
        // stored rendering uses the generic body in the recipient's primary
        // registration language (default language when unregistered).
        let mut records_written = 0usize;
        for recipient in &recipients {
            let language = by_user
                .get(&recipient.user_id)
                .and_then(|regs| regs.first())
                .map(|reg| reg.language.as_str())
                .unwrap_or_else(|| self.catalog.default_language());
            let message = self.catalog.localize_generic(kind, context, language);
            match self
                .store
                .create(recipient.user_id, kind, &message.body, context.project_id)
                .await
            {
                Ok(_) => records_written += 1,
                Err(e) => {
                    tracing::warn!(
                        user_id = %recipient.user_id,
                        kind = %kind,
                        error = %e,
                        "Failed to write in-app notification"
                    );
                }
            }
        }

        let outcome = DispatchOutcome {
            recipients: recipients.len(),
            pushes_sent,
            pushes_failed,
            records_written,
        };
        tracing::info!(
            kind = %kind,
            recipients = outcome.recipients,
            pushes_sent = outcome.pushes_sent,
            pushes_failed = outcome.pushes_failed,
            records_written = outcome.records_written,
            "Dispatch complete"
        );

        Ok(outcome)
    }
}

/// Channel-agnostic extra payload forwarded with every push.
fn push_extra(context: &NotificationContext) -> serde_json::Value {
    let mut extra = serde_json::Map::new();
    if let Some(project_id) = context.project_id {
        extra.insert(
            "project_id".to_string(),
            serde_json::Value::String(project_id.to_string()),
        );
    }
    if let Some(transaction_id) = context.transaction_id {
        extra.insert(
            "transaction_id".to_string(),
            serde_json::Value::String(transaction_id.to_string()),
        );
    }
    serde_json::Value::Object(extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_extra_includes_present_ids_only() {
        let project_id = Uuid::new_v4();
        let ctx = NotificationContext {
            project_id: Some(project_id),
            ..Default::default()
        };
        let extra = push_extra(&ctx);
        assert_eq!(
            extra.get("project_id").and_then(|v| v.as_str()),
            Some(project_id.to_string().as_str())
        );
        assert!(extra.get("transaction_id").is_none());
    }
}
