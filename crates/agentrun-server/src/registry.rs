//! In-memory run registry.
//!
//! Single source of truth for client-visible run state. Entries are created
//! once in `PENDING` and never removed.

use std::collections::HashMap;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use agentrun_core::{CoreError, RunId, RunRecord, RunState};

struct RunEntry {
    record: RunRecord,
    state_tx: watch::Sender<RunState>,
}

/// Registry of all runs admitted by this process.
#[derive(Default)]
pub struct RunRegistry {
    runs: RwLock<HashMap<RunId, RunEntry>>,
}

impl RunRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new pending run.
    pub async fn create(&self, record: RunRecord) -> Result<(), CoreError> {
        if record.state != RunState::Pending {
            return Err(CoreError::InvalidInput(format!(
                "new run {} must be {}, got {}",
                record.run_id,
                RunState::Pending,
                record.state
            )));
        }

        let mut runs = self.runs.write().await;
        if runs.contains_key(&record.run_id) {
            return Err(CoreError::DuplicateRun(record.run_id));
        }

        let (state_tx, _) = watch::channel(record.state);
        debug!(run_id = %record.run_id, "Run registered");
        runs.insert(record.run_id, RunEntry { record, state_tx });
        Ok(())
    }

    /// Snapshot of a run.
    pub async fn get(&self, run_id: &RunId) -> Result<RunRecord, CoreError> {
        self.runs
            .read()
            .await
            .get(run_id)
            .map(|entry| entry.record.clone())
            .ok_or(CoreError::RunNotFound(*run_id))
    }

    /// Subscribe to state changes of a run.
    ///
    /// The receiver starts at the current state. Later states arrive in
    /// lifecycle order; quick successive transitions may be coalesced.
    pub async fn watch(&self, run_id: &RunId) -> Result<watch::Receiver<RunState>, CoreError> {
        self.runs
            .read()
            .await
            .get(run_id)
            .map(|entry| entry.state_tx.subscribe())
            .ok_or(CoreError::RunNotFound(*run_id))
    }

    pub async fn set_running(&self, run_id: &RunId) -> Result<(), CoreError> {
        self.update(run_id, |record| record.start()).await
    }

    pub async fn set_done(&self, run_id: &RunId, result: Option<String>) -> Result<(), CoreError> {
        self.update(run_id, |record| record.complete(result)).await
    }

    pub async fn set_failed(&self, run_id: &RunId, error: impl Into<String>) -> Result<(), CoreError> {
        let error = error.into();
        self.update(run_id, |record| record.fail(error)).await
    }

    /// Number of registered runs.
    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    /// Returns true if no run has been registered.
    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }

    /// Count runs per state, in lifecycle order.
    pub async fn state_counts(&self) -> Vec<(RunState, u64)> {
        let runs = self.runs.read().await;
        RunState::ALL
            .into_iter()
            .map(|state| {
                let count = runs.values().filter(|e| e.record.state == state).count() as u64;
                (state, count)
            })
            .collect()
    }

    async fn update<F>(&self, run_id: &RunId, apply: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut RunRecord) -> Result<(), CoreError>,
    {
        let mut runs = self.runs.write().await;
        let entry = runs.get_mut(run_id).ok_or(CoreError::RunNotFound(*run_id))?;
        apply(&mut entry.record)?;
        entry.state_tx.send_replace(entry.record.state);
        debug!(run_id = %run_id, state = %entry.record.state, "Run updated");
        Ok(())
    }
}
