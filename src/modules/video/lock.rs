use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// Per-name mutual exclusion for the local working directories.
///
/// Jobs for the same file name share paths on disk, so they must not overlap.
/// Jobs for different names never wait on each other.
#[derive(Clone, Default)]
pub struct NameLocks {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

pub struct NameGuard {
    locks: NameLocks,
    name: String,
    slot: Slot,
    _held: OwnedMutexGuard<()>,
}

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, name: &str) -> NameGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(name.to_string()).or_default().clone()
        };

        let held = slot.clone().lock_owned().await;

        NameGuard {
            locks: self.clone(),
            name: name.to_string(),
            slot,
            _held: held,
        }
    }

    /// Number of names currently held or waited on.
    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for NameGuard {
    fn drop(&mut self) {
        let mut slots = self.locks.slots.lock().unwrap_or_else(|e| e.into_inner());
        // map entry + our slot handle + the held guard; anything more is a waiter
        if Arc::strong_count(&self.slot) <= 3 {
            slots.remove(&self.name);
        }
    }
}
