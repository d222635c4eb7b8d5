//! Cancellable per-member activity timers.
//!
//! Each timer is a tokio task keyed by `(channel_id, user_id)` that sleeps for a delay
//! and then runs a callback. Every `start` hands out a new generation number, and a
//! task that wakes up must claim its slot with that generation before running its
//! callback. Cancelling or replacing a timer removes the slot under the same lock, so a
//! task that has already woken but not yet claimed can never fire afterwards.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// `(channel_id, user_id)` pair identifying a timer.
pub type TimerKey = (u64, u64);

struct TimerSlot {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct TimerTable {
    next_generation: u64,
    slots: HashMap<TimerKey, TimerSlot>,
}

/// Table of live activity timers, at most one per key.
#[derive(Clone, Default)]
pub struct ActivityTimers {
    table: Arc<Mutex<TimerTable>>,
}

impl ActivityTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a timer for `key`, cancelling any timer already running for it.
    ///
    /// # Arguments
    /// - `key` - Channel and user the timer belongs to
    /// - `delay` - How long to wait before firing
    /// - `on_fire` - Callback run once the delay elapses without cancellation
    pub fn start<F, Fut>(&self, key: TimerKey, delay: Duration, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut table = self.lock();
        table.next_generation += 1;
        let generation = table.next_generation;

        let timers = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if timers.claim(key, generation) {
                on_fire().await;
            }
        });

        if let Some(previous) = table.slots.insert(key, TimerSlot { generation, handle }) {
            previous.handle.abort();
        }
    }

    /// Cancels the timer for `key`.
    ///
    /// # Returns
    /// - `true` - A live timer was cancelled
    /// - `false` - No timer was running for the key
    pub fn cancel(&self, key: TimerKey) -> bool {
        match self.lock().slots.remove(&key) {
            Some(slot) => {
                slot.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels every live timer and returns how many there were.
    pub fn cancel_all(&self) -> usize {
        let mut table = self.lock();
        let count = table.slots.len();

        for (_, slot) in table.slots.drain() {
            slot.handle.abort();
        }

        count
    }

    #[cfg(test)]
    pub fn is_active(&self, key: TimerKey) -> bool {
        self.lock().slots.contains_key(&key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }

    /// Removes the slot for `key` if it still belongs to `generation`.
    ///
    /// Only the task that wins this claim may run its callback.
    fn claim(&self, key: TimerKey, generation: u64) -> bool {
        let mut table = self.lock();

        match table.slots.get(&key) {
            Some(slot) if slot.generation == generation => {
                table.slots.remove(&key);
                true
            }
            _ => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimerTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
