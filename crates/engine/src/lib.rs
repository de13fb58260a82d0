//! Notification determination engine.
//!
//! Decides who gets notified about a domain event and what the message says:
//! permission matrix → guard → recipient resolution, plus localized template
//! rendering and the keyed cooldown store used for rate-limited kinds.

pub mod catalog;
pub mod cooldown;
pub mod guard;
pub mod params;
pub mod permissions;
pub mod resolver;
