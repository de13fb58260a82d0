//! Keyed cooldown store with TTL expiry.
//!
//! Rate-limited kinds (budget-threshold above all) go through this store so
//! repeat events inside the window are suppressed. The store is injected as a
//! collaborator; there is no ambient last-sent map.
//!
//! The Redis implementation uses `SET NX EX` for an atomic check-and-set with
//! automatic expiry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use herald_common::error::HeraldError;
use herald_common::types::NotificationKind;

/// Cooldown key for a (project, kind) pair.
pub fn cooldown_key(project_id: Uuid, kind: NotificationKind) -> String {
    format!("project:cooldown:{}:{}", project_id, kind)
}

#[async_trait]
pub trait CooldownStore: Send + Sync {
    /// Check whether the key is in cooldown, and if not, set the cooldown.
    ///
    /// Returns `true` if the key was NOT in cooldown (the caller should
    /// proceed), `false` if it was (the caller should suppress).
    async fn check_and_set(&self, key: &str, ttl_seconds: u64) -> Result<bool, HeraldError>;

    /// Drop the cooldown for a key (e.g. when the project budget is changed).
    async fn clear(&self, key: &str) -> Result<(), HeraldError>;
}

/// Redis-backed cooldown store.
pub struct RedisCooldownStore {
    conn: ConnectionManager,
}

impl RedisCooldownStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connect via the shared Redis helper.
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let conn = herald_common::pool::redis_manager(redis_url).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl CooldownStore for RedisCooldownStore {
    async fn check_and_set(&self, key: &str, ttl_seconds: u64) -> Result<bool, HeraldError> {
        let mut conn = self.conn.clone();

        // SET key "1" NX EX ttl
        // Some("OK") if the key was set (not in cooldown), None if it exists.
        let result: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await?;

        let allowed = result.is_some();
        if !allowed {
            tracing::debug!(key, ttl_seconds, "Notification suppressed, key in cooldown");
        }

        Ok(allowed)
    }

    async fn clear(&self, key: &str) -> Result<(), HeraldError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

/// In-memory cooldown store for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryCooldownStore {
    deadlines: Mutex<HashMap<String, Instant>>,
}

impl MemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CooldownStore for MemoryCooldownStore {
    async fn check_and_set(&self, key: &str, ttl_seconds: u64) -> Result<bool, HeraldError> {
        let mut deadlines = self
            .deadlines
            .lock()
            .map_err(|_| HeraldError::Store("cooldown lock poisoned".to_string()))?;

        let now = Instant::now();
        if let Some(deadline) = deadlines.get(key)
            && *deadline > now
        {
            return Ok(false);
        }

        deadlines.insert(key.to_string(), now + Duration::from_secs(ttl_seconds));
        Ok(true)
    }

    async fn clear(&self, key: &str) -> Result<(), HeraldError> {
        let mut deadlines = self
            .deadlines
            .lock()
            .map_err(|_| HeraldError::Store("cooldown lock poisoned".to_string()))?;
        deadlines.remove(key);
        Ok(())
    }
}
