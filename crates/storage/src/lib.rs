//! Postgres-backed implementations of the notification collaborator
//! contracts: the recipient directory, the in-app notification store and
//! device-registration upkeep.

pub mod devices;
pub mod directory;
pub mod store;

pub use devices::DeviceService;
pub use directory::PgDirectory;
pub use store::PgNotificationStore;
