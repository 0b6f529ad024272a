//! HTTP request handlers.

mod health;
mod runs;

pub use health::{health_check, metrics_handler};
pub use runs::{get_run_status, submit_run};
