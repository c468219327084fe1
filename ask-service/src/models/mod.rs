//! Domain models for the ask service.

pub mod message;

pub use message::{Message, DEFAULT_ROLE};
