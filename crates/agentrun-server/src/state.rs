//! Shared application state.

use std::sync::Arc;

use crate::agents::{AgentFactory, BuiltinAgents};
use crate::config::Config;
use crate::gate::AdmissionGate;
use crate::registry::RunRegistry;

/// Shared application state.
pub struct AppState {
    /// All runs admitted by this process.
    pub registry: RunRegistry,

    /// Single-slot execution gate.
    pub gate: AdmissionGate,

    /// Builds agents for admitted runs.
    pub agents: Arc<dyn AgentFactory>,

    /// Server configuration.
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the built-in agents, wrapped in Arc.
    pub fn new(config: Config) -> Arc<Self> {
        let agents = match config.agent_seed {
            Some(seed) => BuiltinAgents::seeded(config.agent_delay, seed),
            None => BuiltinAgents::new(config.agent_delay),
        };
        Self::with_agents(config, Arc::new(agents))
    }

    /// Create a new AppState with a custom agent factory.
    pub fn with_agents(config: Config, agents: Arc<dyn AgentFactory>) -> Arc<Self> {
        Arc::new(Self {
            registry: RunRegistry::new(),
            gate: AdmissionGate::new(),
            agents,
            config,
        })
    }
}
