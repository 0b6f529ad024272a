//! Admission gate: a single process-wide slot for agent execution.
//!
//! Backed by a one-permit semaphore so that peeking never takes the slot.
//! The slot is held by an [`AdmissionPermit`] and released when it drops,
//! which covers early returns, errors and unwinding alike.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Single-slot admission gate. Cloning shares the same slot.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    slot: Arc<Semaphore>,
}

/// Proof of holding the gate. Dropping it releases the slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    /// Create a new, free gate.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Non-blocking peek. Never acquires the slot.
    pub fn try_is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }

    /// Take the slot if it is free, or return `None` immediately.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        match self.slot.clone().try_acquire_owned() {
            Ok(permit) => Some(AdmissionPermit { _permit: permit }),
            Err(TryAcquireError::NoPermits) | Err(TryAcquireError::Closed) => None,
        }
    }

    /// Wait until the slot is free and take it.
    ///
    /// Returns `None` only if the underlying semaphore has been closed.
    pub async fn acquire(&self) -> Option<AdmissionPermit> {
        self.slot
            .clone()
            .acquire_owned()
            .await
            .ok()
            .map(|permit| AdmissionPermit { _permit: permit })
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}
