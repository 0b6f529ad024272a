//! Run record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AgentType, CoreError, RunId, RunState, UserId};

/// Everything tracked about a single run.
///
/// `result` is only ever set in `Done` and `error` only in `Failed`; the
/// transition methods below are the only way either gets populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique run identifier.
    pub run_id: RunId,

    /// Agent this run executes.
    pub agent_type: AgentType,

    /// User the run was submitted for.
    pub user_id: UserId,

    /// Current lifecycle state.
    pub state: RunState,

    /// Agent output, if the run finished and the agent returned one.
    pub result: Option<String>,

    /// Error message if the run failed.
    pub error: Option<String>,

    /// When the run was admitted.
    pub created_at: DateTime<Utc>,

    /// When the agent started executing.
    pub started_at: Option<DateTime<Utc>>,

    /// When the run reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    /// Create a new pending run with a fresh id.
    pub fn new(agent_type: AgentType, user_id: UserId) -> Self {
        Self::with_id(RunId::generate(), agent_type, user_id)
    }

    /// Create a new pending run with a specific id.
    pub fn with_id(run_id: RunId, agent_type: AgentType, user_id: UserId) -> Self {
        Self {
            run_id,
            agent_type,
            user_id,
            state: RunState::Pending,
            result: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Mark the run as started.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.transition(RunState::Running)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Mark the run as completed with the agent's output.
    pub fn complete(&mut self, result: Option<String>) -> Result<(), CoreError> {
        self.transition(RunState::Done)?;
        self.result = result;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Mark the run as failed.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), CoreError> {
        self.transition(RunState::Failed)?;
        self.error = Some(error.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, to: RunState) -> Result<(), CoreError> {
        if !self.state.can_transition_to(to) {
            return Err(CoreError::InvalidStateTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
