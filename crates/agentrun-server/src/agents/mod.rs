//! Agent units and how they are built.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use agentrun_core::{AgentType, UserId};

mod document_extractor;
mod policy_checker;

pub use document_extractor::DocumentExtractor;
pub use policy_checker::PolicyChecker;

/// Errors that can occur while building or running an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Unknown agent type: {0}")]
    UnknownAgentType(AgentType),

    #[error("Agent execution failed: {0}")]
    Execution(String),

    #[error("Agent panicked: {0}")]
    Panicked(String),
}

/// A unit of background work.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Do the work. May suspend and may fail.
    async fn run(&self) -> Result<Option<String>, AgentError>;
}

/// Builds the agent for a requested type.
pub trait AgentFactory: Send + Sync {
    fn create(&self, agent_type: AgentType, user_id: UserId) -> Result<Box<dyn Agent>, AgentError>;
}

/// Shared RNG handle for agents that make random decisions.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Factory for the agents shipped with the server.
pub struct BuiltinAgents {
    delay: Duration,
    rng: SharedRng,
}

impl BuiltinAgents {
    /// Agents that work for `delay`, with an entropy-seeded RNG.
    pub fn new(delay: Duration) -> Self {
        Self::with_rng(delay, StdRng::from_entropy())
    }

    /// Agents with a fixed RNG seed, for reproducible decisions.
    pub fn seeded(delay: Duration, seed: u64) -> Self {
        Self::with_rng(delay, StdRng::seed_from_u64(seed))
    }

    fn with_rng(delay: Duration, rng: StdRng) -> Self {
        Self {
            delay,
            rng: Arc::new(Mutex::new(rng)),
        }
    }
}

impl AgentFactory for BuiltinAgents {
    fn create(&self, agent_type: AgentType, user_id: UserId) -> Result<Box<dyn Agent>, AgentError> {
        let agent: Box<dyn Agent> = match agent_type {
            AgentType::DocumentExtractor => Box::new(DocumentExtractor::new(user_id, self.delay)),
            AgentType::PolicyChecker => {
                Box::new(PolicyChecker::new(user_id, self.delay, self.rng.clone()))
            }
        };
        Ok(agent)
    }
}
