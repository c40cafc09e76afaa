use huddle_domain::ID;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async lock per `Event`. Holders of the lock of an event run one at a
/// time, in the order they asked for it.
#[derive(Clone, Default)]
pub struct EventLocks {
    locks: Arc<Mutex<HashMap<ID, Arc<AsyncMutex<()>>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, event_id: &ID) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(*event_id)
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Drops the locks of events that no longer exist
    pub fn forget(&self, event_ids: &[ID]) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        for event_id in event_ids {
            locks.remove(event_id);
        }
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
