//! Device registration upkeep.
//!
//! A device token belongs to at most one user at any time: registering a
//! token that already exists moves it to the new owner and language in place.

use sqlx::PgPool;
use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::types::DeviceRegistration;

pub struct DeviceService;

impl DeviceService {
    /// Register a device token for a user, taking over an existing
    /// registration of the same token (upsert, not append).
    pub async fn register(
        pool: &PgPool,
        token: &str,
        language: &str,
        user_id: Uuid,
    ) -> Result<DeviceRegistration, HeraldError> {
        let registration: DeviceRegistration = sqlx::query_as(
            r#"
            INSERT INTO device_registrations (token, language, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (token)
            DO UPDATE SET language = EXCLUDED.language, user_id = EXCLUDED.user_id,
                          updated_at = now()
            RETURNING token, language, user_id
            "#,
        )
        .bind(token)
        .bind(language)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        tracing::info!(user_id = %user_id, language, "Device registered");

        Ok(registration)
    }

    /// Remove a registration. Returns true if the token existed.
    pub async fn unregister(pool: &PgPool, token: &str) -> Result<bool, HeraldError> {
        let result = sqlx::query("DELETE FROM device_registrations WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All registrations owned by a user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<DeviceRegistration>, HeraldError> {
        let registrations: Vec<DeviceRegistration> = sqlx::query_as(
            "SELECT token, language, user_id FROM device_registrations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(registrations)
    }
}
