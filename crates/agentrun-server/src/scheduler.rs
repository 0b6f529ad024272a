//! Run scheduler - admits runs and drives them to a terminal state.
//!
//! Admission takes the gate atomically: the permit is acquired in
//! [`Scheduler::submit`] and moved into the background task, so a run counts
//! as busy from the moment it is admitted (while still `PENDING`) until it
//! reaches `DONE` or `FAILED`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use agentrun_core::{AgentType, CoreError, RunId, RunRecord, UserId};

use crate::agents::{AgentError, AgentFactory};
use crate::gate::AdmissionPermit;
use crate::state::AppState;

/// Scheduler errors.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Another agent is already running")]
    Busy,

    #[error(transparent)]
    Registry(#[from] CoreError),
}

/// Handle to an admitted run.
///
/// Dropping the ticket does not affect the run.
#[derive(Debug)]
pub struct RunTicket {
    run_id: RunId,
    handle: JoinHandle<()>,
}

impl RunTicket {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Wait until the run has reached a terminal state and released the gate.
    pub async fn finished(self) -> RunId {
        let RunTicket { run_id, handle } = self;
        if let Err(e) = handle.await {
            error!(run_id = %run_id, error = %e, "Run task aborted");
        }
        run_id
    }
}

/// Run scheduler.
pub struct Scheduler {
    state: Arc<AppState>,
}

impl Scheduler {
    /// Create a new Scheduler.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Admit a run and start it in the background.
    ///
    /// Returns immediately; the outcome is only visible through the registry.
    pub async fn submit(
        &self,
        agent_type: AgentType,
        user_id: UserId,
    ) -> Result<RunTicket, SchedulerError> {
        let Some(permit) = self.state.gate.try_acquire() else {
            warn!(
                agent_type = %agent_type,
                user = %user_id,
                reason = "agent already running",
                "Run rejected"
            );
            return Err(SchedulerError::Busy);
        };

        let record = RunRecord::new(agent_type, user_id);
        let run_id = record.run_id;
        self.state.registry.create(record).await?;

        info!(run_id = %run_id, agent_type = %agent_type, user = %user_id, "Run admitted");

        let handle = tokio::spawn(execute(
            self.state.clone(),
            run_id,
            agent_type,
            user_id,
            permit,
        ));

        Ok(RunTicket { run_id, handle })
    }
}

/// Background part of a run. Never returns an error: every outcome ends up
/// in the registry. The gate is released when `permit` drops.
async fn execute(
    state: Arc<AppState>,
    run_id: RunId,
    agent_type: AgentType,
    user_id: UserId,
    permit: AdmissionPermit,
) {
    let _permit = permit;

    if let Err(e) = state.registry.set_running(&run_id).await {
        error!(run_id = %run_id, error = %e, "Failed to start run");
        return;
    }
    info!(run_id = %run_id, agent_type = %agent_type, user = %user_id, "Run started");

    let recorded = match run_agent(state.agents.as_ref(), agent_type, user_id).await {
        Ok(result) => {
            info!(run_id = %run_id, agent_type = %agent_type, result = ?result, "Run completed");
            state.registry.set_done(&run_id, result).await
        }
        Err(e) => {
            error!(run_id = %run_id, agent_type = %agent_type, user = %user_id, error = %e, "Agent failed");
            state.registry.set_failed(&run_id, e.to_string()).await
        }
    };

    if let Err(e) = recorded {
        error!(run_id = %run_id, error = %e, "Failed to record run outcome");
    }
}

async fn run_agent(
    agents: &dyn AgentFactory,
    agent_type: AgentType,
    user_id: UserId,
) -> Result<Option<String>, AgentError> {
    let work = async {
        let agent = agents.create(agent_type, user_id)?;
        agent.run().await
    };
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => Err(AgentError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use crate::config::Config;
    use agentrun_core::RunState;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Clone)]
    enum Behavior {
        Fail(&'static str),
        Panic,
        Hold(Arc<Notify>),
        Unknown,
        BrokenFactory,
    }

    struct TestAgent(Behavior);

    #[async_trait]
    impl Agent for TestAgent {
        fn name(&self) -> &'static str {
            "test-agent"
        }

        async fn run(&self) -> Result<Option<String>, AgentError> {
            match &self.0 {
                Behavior::Fail(msg) => Err(AgentError::Execution(msg.to_string())),
                Behavior::Panic => panic!("agent blew up"),
                Behavior::Hold(release) => {
                    release.notified().await;
                    Ok(None)
                }
                Behavior::Unknown | Behavior::BrokenFactory => {
                    unreachable!("factory never builds this behavior")
                }
            }
        }
    }

    struct TestAgents(Behavior);

    impl AgentFactory for TestAgents {
        fn create(&self, agent_type: AgentType, _user_id: UserId) -> Result<Box<dyn Agent>, AgentError> {
            match self.0 {
                Behavior::Unknown => Err(AgentError::UnknownAgentType(agent_type)),
                Behavior::BrokenFactory => panic!("factory misconfigured"),
                ref behavior => Ok(Box::new(TestAgent(behavior.clone()))),
            }
        }
    }

    fn scheduler_with(behavior: Behavior) -> (Scheduler, Arc<AppState>) {
        let state = AppState::with_agents(Config::default(), Arc::new(TestAgents(behavior)));
        (Scheduler::new(state.clone()), state)
    }

    fn fast_state() -> Arc<AppState> {
        let config = Config {
            agent_delay: Duration::from_millis(10),
            agent_seed: Some(11),
            ..Config::default()
        };
        AppState::new(config)
    }

    #[tokio::test]
    async fn test_document_extractor_done_without_result() {
        let state = fast_state();
        let scheduler = Scheduler::new(state.clone());

        let ticket = scheduler
            .submit(AgentType::DocumentExtractor, UserId::generate())
            .await
            .unwrap();
        let run_id = ticket.finished().await;

        let run = state.registry.get(&run_id).await.unwrap();
        assert_eq!(run.state, RunState::Done);
        assert!(run.result.is_none());
        assert!(run.error.is_none());
        assert!(!state.gate.try_is_busy());
    }

    #[tokio::test]
    async fn test_policy_checker_decision() {
        let state = fast_state();
        let scheduler = Scheduler::new(state.clone());

        let ticket = scheduler
            .submit(AgentType::PolicyChecker, UserId::generate())
            .await
            .unwrap();
        let run_id = ticket.finished().await;

        let run = state.registry.get(&run_id).await.unwrap();
        assert_eq!(run.state, RunState::Done);
        let result = run.result.expect("policy checker returns a decision");
        assert!(result == "approved" || result == "rejected", "got {result}");
    }

    #[tokio::test]
    async fn test_busy_while_run_in_flight() {
        let release = Arc::new(Notify::new());
        let (scheduler, state) = scheduler_with(Behavior::Hold(release.clone()));

        let first = scheduler
            .submit(AgentType::DocumentExtractor, UserId::generate())
            .await
            .unwrap();
        assert!(state.gate.try_is_busy());

        let err = scheduler
            .submit(AgentType::PolicyChecker, UserId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::Busy));
        assert_eq!(err.to_string(), "Another agent is already running");
        assert_eq!(state.registry.len().await, 1);

        release.notify_one();
        first.finished().await;

        assert!(!state.gate.try_is_busy());
        let second = scheduler
            .submit(AgentType::DocumentExtractor, UserId::generate())
            .await
            .unwrap();
        release.notify_one();
        second.finished().await;
        assert_eq!(state.registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_racing_submits_admit_one() {
        let release = Arc::new(Notify::new());
        let (scheduler, state) = scheduler_with(Behavior::Hold(release.clone()));

        let (a, b) = tokio::join!(
            scheduler.submit(AgentType::DocumentExtractor, UserId::generate()),
            scheduler.submit(AgentType::PolicyChecker, UserId::generate()),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(state.registry.len().await, 1);

        release.notify_one();
        for ticket in [a, b].into_iter().flatten() {
            ticket.finished().await;
        }
    }

    #[tokio::test]
    async fn test_agent_error_recorded_as_failed() {
        let (scheduler, state) = scheduler_with(Behavior::Fail("disk on fire"));

        let ticket = scheduler
            .submit(AgentType::DocumentExtractor, UserId::generate())
            .await
            .unwrap();
        let run_id = ticket.finished().await;

        let run = state.registry.get(&run_id).await.unwrap();
        assert_eq!(run.state, RunState::Failed);
        assert!(run.result.is_none());
        assert!(run.error.unwrap().contains("disk on fire"));
        assert!(!state.gate.try_is_busy());
    }

    #[tokio::test]
    async fn test_panicking_agent_recorded_and_gate_released() {
        let (scheduler, state) = scheduler_with(Behavior::Panic);

        let ticket = scheduler
            .submit(AgentType::PolicyChecker, UserId::generate())
            .await
            .unwrap();
        let run_id = ticket.finished().await;

        let run = state.registry.get(&run_id).await.unwrap();
        assert_eq!(run.state, RunState::Failed);
        assert_eq!(run.error.as_deref(), Some("Agent panicked: agent blew up"));
        assert!(!state.gate.try_is_busy());
    }

    #[tokio::test]
    async fn test_panicking_factory_recorded_and_gate_released() {
        let (scheduler, state) = scheduler_with(Behavior::BrokenFactory);

        let ticket = scheduler
            .submit(AgentType::DocumentExtractor, UserId::generate())
            .await
            .unwrap();
        let run_id = ticket.finished().await;

        let run = state.registry.get(&run_id).await.unwrap();
        assert_eq!(run.state, RunState::Failed);
        assert_eq!(run.error.as_deref(), Some("Agent panicked: factory misconfigured"));
        assert!(run.result.is_none());
        assert!(!state.gate.try_is_busy());
    }

    #[tokio::test]
    async fn test_unknown_agent_type_recorded_as_failed() {
        let (scheduler, state) = scheduler_with(Behavior::Unknown);

        let ticket = scheduler
            .submit(AgentType::PolicyChecker, UserId::generate())
            .await
            .unwrap();
        let run_id = ticket.finished().await;

        let run = state.registry.get(&run_id).await.unwrap();
        assert_eq!(run.state, RunState::Failed);
        assert_eq!(run.error.as_deref(), Some("Unknown agent type: policy-checker"));
    }

    #[tokio::test]
    async fn test_observed_states_are_monotonic() {
        let release = Arc::new(Notify::new());
        let (scheduler, state) = scheduler_with(Behavior::Hold(release.clone()));

        let ticket = scheduler
            .submit(AgentType::DocumentExtractor, UserId::generate())
            .await
            .unwrap();
        let mut rx = state.registry.watch(&ticket.run_id()).await.unwrap();

        let observer = tokio::spawn(async move {
            let mut seen = vec![*rx.borrow_and_update()];
            while !seen.last().is_some_and(RunState::is_terminal) {
                if rx.changed().await.is_err() {
                    break;
                }
                seen.push(*rx.borrow_and_update());
            }
            seen
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        release.notify_one();
        ticket.finished().await;

        let seen = tokio::time::timeout(Duration::from_secs(1), observer)
            .await
            .unwrap()
            .unwrap();
        let order = |s: &RunState| RunState::ALL.iter().position(|x| x == s).unwrap();
        assert!(seen.windows(2).all(|w| order(&w[0]) < order(&w[1])), "{seen:?}");
        assert_eq!(seen.last(), Some(&RunState::Done));
    }
}
