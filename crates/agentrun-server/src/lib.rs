//! AgentRun Server Library
//!
//! Admits at most one agent run at a time, executes it in the background and
//! serves its status over HTTP.

pub mod agents;
pub mod config;
pub mod gate;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod scheduler;
pub mod state;

pub use config::Config;
pub use gate::{AdmissionGate, AdmissionPermit};
pub use registry::RunRegistry;
pub use scheduler::{RunTicket, Scheduler, SchedulerError};
pub use state::AppState;
