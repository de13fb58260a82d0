//! Notification dispatch: bounded concurrent fan-out with failure isolation.
//!
//! [`Dispatcher`] performs one stateless fan-out per call: resolve eligible
//! recipients, push to every device concurrently, and write exactly one
//! in-app record per recipient. [`service::DispatchService`] wraps it in a
//! detached worker so business operations never wait on delivery.

pub mod dispatcher;
pub mod service;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use service::{DispatchRequest, DispatchService};
