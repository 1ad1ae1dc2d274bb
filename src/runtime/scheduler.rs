//! Scheduler - Virtual clock for timeouts and intervals
//!
//! Single-threaded replacement for the host's timer queue. Time only moves
//! when [`Scheduler::advance`] is called, so tests step through autoplay and
//! delayed callbacks deterministically.
//!
//! # Pattern
//!
//! - Tasks due at the same instant run in registration order
//! - An interval is rescheduled before its task runs, so a task that clears
//!   its own timer stops it for good
//! - A task returning `Err` is logged and suppressed
//!
//! # Example
//!
//! ```ignore
//! let scheduler = Scheduler::new();
//! let id = scheduler.set_interval(ms(5000), || { advance(); Ok(()) });
//! scheduler.advance(ms(10_000)); // fires twice
//! scheduler.clear(id);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use crate::error::Result;

/// Handle to a scheduled timeout or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

type Task = Rc<RefCell<dyn FnMut() -> Result<()>>>;

struct Entry {
    due: Duration,
    period: Option<Duration>,
    /// Tie-breaker for equal due times: lower runs first.
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: BTreeMap<TimerId, Entry>,
}

impl SchedulerState {
    fn next_due(&self, limit: Duration) -> Option<TimerId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.due <= limit)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(id, _)| *id)
    }
}

/// Cheap-to-clone handle to a shared timer queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Scheduler")
            .field("now", &state.now)
            .field("active", &state.entries.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn insert(&self, delay: Duration, period: Option<Duration>, task: Task) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now + delay;
        state.entries.insert(
            id,
            Entry {
                due,
                period,
                seq,
                task,
            },
        );
        id
    }

    /// Run `task` once after `delay`.
    pub fn set_timeout(&self, delay: Duration, task: impl FnOnce() -> Result<()> + 'static) -> TimerId {
        let mut slot = Some(task);
        self.insert(
            delay,
            None,
            Rc::new(RefCell::new(move || match slot.take() {
                Some(task) => task(),
                None => Ok(()),
            })),
        )
    }

    /// Run `task` every `period`, first after one period.
    ///
    /// A zero period is treated as one millisecond so `advance` terminates.
    pub fn set_interval(&self, period: Duration, task: impl FnMut() -> Result<()> + 'static) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(period, Some(period), Rc::new(RefCell::new(task)))
    }

    /// Cancel a timer. Returns whether it was still active.
    pub fn clear(&self, id: TimerId) -> bool {
        self.state.borrow_mut().entries.remove(&id).is_some()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.state.borrow().entries.contains_key(&id)
    }

    /// Number of pending timeouts and live intervals.
    pub fn active_count(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Number of live intervals.
    pub fn interval_count(&self) -> usize {
        self.state
            .borrow()
            .entries
            .values()
            .filter(|e| e.period.is_some())
            .count()
    }

    /// Move the clock forward, running every task that falls due on the way.
    ///
    /// Returns the number of task runs.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut runs = 0;

        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let Some(id) = state.next_due(target) else {
                    break;
                };
                let next_seq = state.next_seq;
                let entry = state.entries.get_mut(&id).map(|entry| {
                    let due = entry.due;
                    let task = entry.task.clone();
                    if let Some(period) = entry.period {
                        entry.due = due + period;
                        entry.seq = next_seq;
                    }
                    (due, task, entry.period.is_some())
                });
                let Some((due, task, repeating)) = entry else {
                    break;
                };
                if repeating {
                    state.next_seq += 1;
                } else {
                    state.entries.remove(&id);
                }
                state.now = due;
                task
            };

            runs += 1;
            let result = {
                let mut run = task.borrow_mut();
                (&mut *run)()
            };
            if let Err(err) = result {
                tracing::error!(error = %err, "unhandled rejection in scheduled task");
            }
        }

        self.state.borrow_mut().now = target;
        runs
    }
}

// =============================================================================
// TESTS
// =============================================================================
