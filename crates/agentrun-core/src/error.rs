//! Core domain errors.

use thiserror::Error;

use crate::{RunId, RunState};

/// Core domain errors for AgentRun.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Run not found.
    #[error("Run not found: {0}")]
    RunNotFound(RunId),

    /// A run with this id is already registered.
    #[error("Run already exists: {0}")]
    DuplicateRun(RunId),

    /// Invalid state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: RunState, to: RunState },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
