use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Redis connection string (cooldown store)
    pub redis_url: String,

    /// Language used when a recipient has no matching bundle or no registration
    pub default_language: String,

    /// Maximum number of concurrent outbound push deliveries (default: 16)
    pub push_concurrency: usize,

    /// Bounded depth of the detached dispatch queue (default: 256)
    pub dispatch_queue_depth: usize,

    /// Default cooldown period in seconds for rate-limited kinds (default: 300)
    pub cooldown_seconds: u64,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),
            push_concurrency: std::env::var("PUSH_CONCURRENCY")
                .unwrap_or_else(|_| "16".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PUSH_CONCURRENCY must be a valid usize"))?,
            dispatch_queue_depth: std::env::var("DISPATCH_QUEUE_DEPTH")
                .unwrap_or_else(|_| "256".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DISPATCH_QUEUE_DEPTH must be a valid usize"))?,
            cooldown_seconds: std::env::var("COOLDOWN_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("COOLDOWN_SECONDS must be a valid u64"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
        })
    }
}
