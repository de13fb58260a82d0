use thiserror::Error;

/// Common error types used across the notification pipeline.
///
/// Infrastructure failures (`Database`, `Redis`, `Directory`, `Store`) are
/// deliberately distinct from a guard returning `false`; callers must never
/// conflate "the directory is down" with "this user opted out".
#[derive(Debug, Error)]
pub enum HeraldError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Notification store error: {0}")]
    Store(String),

    #[error("Push delivery error: {0}")]
    Push(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
