pub mod ask;

pub use ask::{AskRequest, AskResponse};
