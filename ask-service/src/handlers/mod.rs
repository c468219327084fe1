//! HTTP handlers for the ask service.

pub mod ask;
pub mod health;

pub use ask::ask;
pub use health::{health_check, metrics_endpoint, not_found, readiness_check};
