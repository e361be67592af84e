use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};
use crate::core::config::QueueConfig;
use crate::core::stats::{QueueStats, StatsSnapshot};

/// Blocking, thread-safe FIFO queue.
///
/// Any number of threads may push, pop and clear concurrently. `pop` parks
/// the caller until an element is available; `pop_timeout` parks it for at
/// most the given duration. Each push wakes at most one waiter, and which
/// waiter is woken is unspecified.
///
/// The queue is not `Clone`. Share it between threads through an `Arc`
/// (see [`SafeQueue`]) so every handle refers to the same lock and condvar.
#[derive(Debug)]
pub struct BlockingQueue<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    stats: QueueStats,
    label: String,
}

impl<T> BlockingQueue<T> {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        let mut items = VecDeque::new();
        // The capacity is only a hint; an unsatisfiable one leaves the buffer
        // to grow on demand.
        if let Err(err) = items.try_reserve(config.initial_capacity) {
            debug!(
                queue = %config.label,
                initial_capacity = config.initial_capacity,
                %err,
                "ignoring initial capacity hint"
            );
        }
        Self {
            items: Mutex::new(items),
            not_empty: Condvar::new(),
            stats: QueueStats::new(),
            label: config.label,
        }
    }

    /// Append an item at the tail and wake one blocked consumer, if any.
    pub fn push(&self, item: T) {
        let len = {
            let mut items = self.lock();
            let len_before = items.len();
            items.push_back(item);
            self.stats.record_push();
            // -- post operation assertion: exactly one element added
            debug_assert_eq!(items.len(), len_before + 1, "push must grow the queue by one");
            items.len()
        };
        trace!(queue = %self.label, len, "push");
        self.not_empty.notify_one();
    }

    /// Remove and return the head, blocking until one is available.
    ///
    /// There is no cancellation: a caller parked here is only released by a
    /// push from another thread.
    pub fn pop(&self) -> T {
        let (item, len) = {
            let mut items = self.lock();
            loop {
                if let Some(taken) = self.take_front(&mut items) {
                    break taken;
                }
                // Spurious wakeups and consumers racing for the same element
                // both land back here with an empty queue.
                items = self
                    .not_empty
                    .wait(items)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };
        trace!(queue = %self.label, len, "pop");
        item
    }

    /// Remove and return the head, waiting at most `timeout` for one.
    ///
    /// Returns `None` if the queue is still empty when the timeout elapses.
    /// A zero timeout checks the queue once without waiting.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let taken = {
            let items = self.lock();
            let (mut items, _) = self
                .not_empty
                .wait_timeout_while(items, timeout, |items| items.is_empty())
                .unwrap_or_else(PoisonError::into_inner);
            // Re-check rather than trusting the timeout flag: an element may
            // have landed between the deadline and reacquiring the lock.
            let taken = self.take_front(&mut items);
            if taken.is_none() {
                self.stats.record_timeout();
            }
            taken
        };
        match taken {
            Some((item, len)) => {
                trace!(queue = %self.label, len, "pop");
                Some(item)
            }
            None => {
                trace!(queue = %self.label, ?timeout, "pop timed out");
                None
            }
        }
    }

    /// Non-blocking poll, same as `pop_timeout(Duration::ZERO)`.
    pub fn try_pop(&self) -> Option<T> {
        self.pop_timeout(Duration::ZERO)
    }

    /// Drop every queued element. Waiters stay parked until the next push.
    ///
    /// The elements are dropped after the lock is released, so a panicking
    /// `Drop` impl neither poisons the queue nor skews its counters.
    pub fn clear(&self) {
        let drained = {
            let mut items = self.lock();
            let drained = std::mem::take(&mut *items);
            self.stats.record_clear(drained.len());
            drained
        };
        debug!(queue = %self.label, discarded = drained.len(), "cleared");
        drop(drained);
    }

    /// Get the current queue length
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Counters and current length, read under the queue lock.
    pub fn stats(&self) -> StatsSnapshot {
        let items = self.lock();
        self.stats.snapshot(&self.label, items.len())
    }

    // Caller holds the lock. Returns the head and the length left behind.
    fn take_front(&self, items: &mut VecDeque<T>) -> Option<(T, usize)> {
        let len_before = items.len();
        let item = items.pop_front()?;
        self.stats.record_pop();
        // -- post operation assertion: exactly one element removed
        debug_assert_eq!(items.len(), len_before - 1, "pop must shrink the queue by one");
        Some((item, items.len()))
    }

    // A panic while the lock is held cannot leave the VecDeque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a queue
pub type SafeQueue<T> = Arc<BlockingQueue<T>>;
