//! Server configuration.

use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address.
    pub bind_addr: String,

    /// Deployment environment name (informational).
    pub app_env: String,

    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Emit logs as JSON lines with RFC 3339 timestamps instead of
    /// human-readable text.
    pub log_json: bool,

    /// How long each agent works before returning.
    pub agent_delay: Duration,

    /// Seed for the policy checker's RNG. `None` seeds from entropy.
    pub agent_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            app_env: "development".to_string(),
            log_level: "info".to_string(),
            log_json: true,
            agent_delay: Duration::from_secs(5),
            agent_seed: None,
        }
    }
}
