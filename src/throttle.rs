use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Admission control for in-flight transfers.
///
/// Caps how many transfers run at once. Built on a counting semaphore so a
/// caller waiting for a slot is parked by the scheduler; admission itself is
/// the suspension point. Capacity is fixed for the lifetime of one run.
#[derive(Clone)]
pub struct ThrottleGate {
    capacity: usize,
    permits: Arc<Semaphore>,
}

/// A held transfer slot. Dropping it releases the slot, so every admission
/// is released exactly once and the active count can never go negative.
pub struct Admission {
    _permit: OwnedSemaphorePermit,
}

impl ThrottleGate {
    /// Create a gate admitting at most `capacity` concurrent transfers.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ThrottleGate {
            capacity,
            permits: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Wait until a transfer slot is free and claim it.
    pub async fn admit(&self) -> Admission {
        // The semaphore is never closed, so acquire cannot fail.
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("throttle semaphore closed");
        Admission { _permit: permit }
    }

    /// Claim a slot without waiting; `None` when the gate is at capacity.
    pub fn try_admit(&self) -> Option<Admission> {
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .ok()
            .map(|permit| Admission { _permit: permit })
    }

    /// Transfers currently admitted.
    pub fn active(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    /// Maximum concurrent transfers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
