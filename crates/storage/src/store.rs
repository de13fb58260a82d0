//! In-app notification records.
//!
//! Records are created by the dispatcher, mutated only by `mark_read`, and
//! deleted explicitly, never updated otherwise.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::traits::NotificationStore;
use herald_common::types::{InAppNotification, NotificationKind};

#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        message: &str,
        project_id: Option<Uuid>,
    ) -> Result<Uuid, HeraldError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO in_app_notifications (id, user_id, kind, message, project_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(kind)
        .bind(message)
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            notification_id = %id,
            user_id = %user_id,
            kind = %kind,
            "In-app notification created"
        );

        Ok(id)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<InAppNotification>, HeraldError> {
        let notifications: Vec<InAppNotification> = sqlx::query_as(
            "SELECT * FROM in_app_notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, HeraldError> {
        let result = sqlx::query(
            "UPDATE in_app_notifications SET is_read = true WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, HeraldError> {
        let result =
            sqlx::query("DELETE FROM in_app_notifications WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(notification_id = %id, "In-app notification deleted");
        }

        Ok(deleted)
    }
}
