//! AgentRun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - HTTP
//! - Async runtime specifics
//!
//! All types here describe runs of agents and their lifecycle.

pub mod agent;
pub mod error;
pub mod ids;
pub mod run;
pub mod status;

// Re-export commonly used types
pub use agent::AgentType;
pub use error::CoreError;
pub use ids::{RunId, UserId};
pub use run::RunRecord;
pub use status::RunState;
