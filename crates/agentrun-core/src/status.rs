//! Run lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a Run.
///
/// Runs move strictly forward: `Pending -> Running -> {Done | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Run admitted but the agent has not started yet.
    Pending,
    /// Agent actively executing.
    Running,
    /// Agent finished successfully.
    Done,
    /// Agent failed.
    Failed,
}

impl RunState {
    /// All states in lifecycle order.
    pub const ALL: [RunState; 4] = [Self::Pending, Self::Running, Self::Done, Self::Failed];

    /// Returns true if the run is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running) | (Self::Running, Self::Done) | (Self::Running, Self::Failed)
        )
    }

    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
