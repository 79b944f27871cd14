//! Single-threaded deferred-task queue driven by the simulation clock.
//!
//! Games never use ambient timers. Delayed work (input lag, delayed notices,
//! countdowns) is entered here and fires from inside `update`, so pausing a
//! game (not calling `advance`) freezes every pending task with it.

use serde::{Deserialize, Serialize};

/// Cancellation token for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

/// Shortest period a repeating task may have.
const MIN_PERIOD_MS: f64 = 1.0;

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TaskId,
    due_ms: f64,
    period_ms: Option<f64>,
    task: T,
}

/// Deferred-task queue. Tasks fire in due-time order, ties broken by
/// scheduling order.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Simulation time elapsed since creation (or the last `reset`).
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Run `task` once, `delay_ms` from now.
    pub fn after(&mut self, delay_ms: f64, task: T) -> TaskId {
        self.insert(delay_ms.max(0.0), None, task)
    }

    /// Run `task` every `period_ms`, first firing one period from now.
    pub fn every(&mut self, period_ms: f64, task: T) -> TaskId {
        let period = period_ms.max(MIN_PERIOD_MS);
        self.insert(period, Some(period), task)
    }

    fn insert(&mut self, delay_ms: f64, period_ms: Option<f64>, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            task,
        });
        id
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending task and rewind the clock to zero.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.now_ms = 0.0;
    }

    /// Move the clock forward and return every task that came due, in order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<T> {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.now_ms += dt_ms;
        }

        let mut fired = Vec::new();
        while let Some(idx) = self.next_due() {
            let entry = &mut self.entries[idx];
            match entry.period_ms {
                Some(period) => {
                    fired.push(entry.task.clone());
                    entry.due_ms += period;
                },
                None => {
                    fired.push(self.entries.remove(idx).task);
                },
            }
        }
        fired
    }

    fn next_due(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= self.now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a.id.0.cmp(&b.id.0))
            })
            .map(|(i, _)| i)
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
