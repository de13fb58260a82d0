//! Postgres-backed recipient directory.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::traits::Directory;
use herald_common::types::{DeviceRegistration, NotificationKind, Role};

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn list_participants(&self, project_id: Uuid) -> Result<Vec<Uuid>, HeraldError> {
        // joined_at keeps the order stable across calls.
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM project_participants WHERE project_id = $1 ORDER BY joined_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    async fn list_device_registrations(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<DeviceRegistration>, HeraldError> {
        let registrations: Vec<DeviceRegistration> = sqlx::query_as(
            "SELECT token, language, user_id FROM device_registrations WHERE user_id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    async fn is_globally_enabled(&self, user_id: Uuid) -> Result<bool, HeraldError> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT notifications_enabled FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        // An unknown user gets nothing rather than an error; the guard treats
        // this the same as an explicit opt-out.
        Ok(row.map(|(enabled,)| enabled).unwrap_or(false))
    }

    async fn get_role(&self, user_id: Uuid, project_id: Uuid) -> Result<Role, HeraldError> {
        let row: Option<(Role,)> = sqlx::query_as(
            "SELECT role FROM project_participants WHERE user_id = $1 AND project_id = $2",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(role,)| role).unwrap_or(Role::Viewer))
    }

    async fn get_project_preference(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        kind: NotificationKind,
    ) -> Result<Option<bool>, HeraldError> {
        let row: Option<(bool,)> = sqlx::query_as(
            r#"
            SELECT enabled FROM notification_preferences
            WHERE user_id = $1 AND project_id = $2 AND kind = $3
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(enabled,)| enabled))
    }
}
