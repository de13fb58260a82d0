pub mod config;
pub mod error;
pub mod pool;
pub mod traits;
pub mod types;
