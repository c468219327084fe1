pub mod answer;
pub mod context;
pub mod metrics;
pub mod providers;

pub use answer::{Answer, AnswerService, AnswerSettings};
pub use metrics::{get_metrics, init_metrics};
