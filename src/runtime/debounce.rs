//! Trailing-edge debounce on the virtual clock.
//!
//! Every call cancels the pending run and schedules a new one, so the wrapped
//! function fires once per burst, `wait` after the last call.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::scheduler::{Scheduler, TimerId};
use crate::error::Result;

/// A debounced callback.
pub struct Debounced {
    scheduler: Scheduler,
    wait: Duration,
    pending: Rc<Cell<Option<TimerId>>>,
    func: Rc<dyn Fn() -> Result<()>>,
}

impl Debounced {
    pub fn new(scheduler: Scheduler, wait: Duration, func: impl Fn() -> Result<()> + 'static) -> Self {
        Self {
            scheduler,
            wait,
            pending: Rc::new(Cell::new(None)),
            func: Rc::new(func),
        }
    }

    /// Restart the quiet period.
    pub fn call(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.clear(id);
        }
        let func = self.func.clone();
        let pending = self.pending.clone();
        let id = self.scheduler.set_timeout(self.wait, move || {
            pending.set(None);
            func()
        });
        self.pending.set(Some(id));
    }

    /// Whether a run is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl std::fmt::Debug for Debounced {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.wait)
            .field("pending", &self.pending.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ms;

    #[test]
    fn test_burst_coalesces_to_one_call() {
        let scheduler = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let debounced = Debounced::new(scheduler.clone(), ms(10), move || {
            h.set(h.get() + 1);
            Ok(())
        });

        for _ in 0..5 {
            debounced.call();
            scheduler.advance(ms(5));
        }
        assert_eq!(hits.get(), 0);
        assert!(debounced.is_pending());

        scheduler.advance(ms(5));
        assert_eq!(hits.get(), 1);
        assert!(!debounced.is_pending());
        assert_eq!(scheduler.active_count(), 0);
    }
}
