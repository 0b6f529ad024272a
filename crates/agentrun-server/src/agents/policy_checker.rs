//! Policy checking agent: waits, then picks a decision at random.

use std::sync::PoisonError;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::info;

use agentrun_core::UserId;

use super::{Agent, AgentError, SharedRng};

/// Possible policy decisions.
pub const DECISIONS: [&str; 2] = ["approved", "rejected"];

/// Placeholder policy agent. Returns one of [`DECISIONS`] at random.
pub struct PolicyChecker {
    user_id: UserId,
    delay: Duration,
    rng: SharedRng,
}

impl PolicyChecker {
    pub fn new(user_id: UserId, delay: Duration, rng: SharedRng) -> Self {
        Self {
            user_id,
            delay,
            rng,
        }
    }

    fn decide(&self) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        DECISIONS.choose(&mut *rng).copied().unwrap_or(DECISIONS[1])
    }
}

#[async_trait]
impl Agent for PolicyChecker {
    fn name(&self) -> &'static str {
        "policy-checker"
    }

    async fn run(&self) -> Result<Option<String>, AgentError> {
        info!(agent = self.name(), user = %self.user_id, "Hello, I am a policy-checker agent");
        tokio::time::sleep(self.delay).await;
        let decision = self.decide();
        info!(agent = self.name(), user = %self.user_id, decision, "complete");
        Ok(Some(decision.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::{Arc, Mutex};

    fn checker(seed: u64) -> PolicyChecker {
        let rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        PolicyChecker::new(UserId::generate(), Duration::ZERO, rng)
    }

    async fn decisions(agent: &PolicyChecker, n: usize) -> Vec<String> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(agent.run().await.unwrap().unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_only_known_decisions() {
        let agent = checker(7);
        for decision in decisions(&agent, 50).await {
            assert!(DECISIONS.contains(&decision.as_str()), "got {decision}");
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_decisions() {
        let a = decisions(&checker(42), 20).await;
        let b = decisions(&checker(42), 20).await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_both_outcomes_reachable() {
        let seen = decisions(&checker(3), 64).await;
        assert!(seen.iter().any(|d| d == "approved"));
        assert!(seen.iter().any(|d| d == "rejected"));
    }
}
