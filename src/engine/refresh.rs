//! Cancellable periodic refresh of live raster sources.
//!
//! At most one refresh handle is active at a time. Starting a new task or
//! cancelling invalidates the previous handle; a task holding a stale handle
//! never fires, so two sources can never race to write the target heights.

use tracing::debug;

/// Shortest cadence a task accepts, in seconds.
const MIN_INTERVAL: f64 = 1e-3;

/// Opaque identity of a refresh task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshHandle(u64);

/// Issues handles and tracks which one is live.
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    next_id: u64,
    active: Option<RefreshHandle>,
}

impl RefreshScheduler {
    /// Creates a scheduler with no active task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new handle and makes it the only active one.
    pub fn start(&mut self) -> RefreshHandle {
        self.cancel();
        self.next_id += 1;
        let handle = RefreshHandle(self.next_id);
        self.active = Some(handle);
        handle
    }

    /// Invalidates the active handle, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            debug!("Cancelled refresh task {:?}", handle);
        }
    }

    /// Whether `handle` is the live one.
    #[must_use]
    pub fn is_active(&self, handle: RefreshHandle) -> bool {
        self.active == Some(handle)
    }

    /// Currently active handle.
    #[must_use]
    pub const fn active(&self) -> Option<RefreshHandle> {
        self.active
    }
}

/// Fixed-cadence task bound to a handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshTask {
    handle: RefreshHandle,
    interval: f64,
    next_due: f64,
}

impl RefreshTask {
    /// Creates a task that first fires at `now + interval`.
    #[must_use]
    pub fn new(handle: RefreshHandle, interval: f64, now: f64) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            handle,
            interval,
            next_due: now + interval,
        }
    }

    /// Handle this task is bound to.
    #[must_use]
    pub const fn handle(&self) -> RefreshHandle {
        self.handle
    }

    /// Returns `true` once per elapsed interval while the handle is active.
    ///
    /// Missed intervals collapse into a single firing; the next deadline
    /// stays on the original cadence.
    pub fn poll(&mut self, scheduler: &RefreshScheduler, now: f64) -> bool {
        if !scheduler.is_active(self.handle) || now.is_nan() || now < self.next_due {
            return false;
        }
        let missed = ((now - self.next_due) / self.interval).floor() + 1.0;
        self.next_due += missed * self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_invalidates_previous() {
        let mut scheduler = RefreshScheduler::new();
        let a = scheduler.start();
        let b = scheduler.start();
        assert_ne!(a, b);
        assert!(!scheduler.is_active(a));
        assert!(scheduler.is_active(b));
    }

    #[test]
    fn test_task_fires_on_cadence() {
        let mut scheduler = RefreshScheduler::new();
        let mut task = RefreshTask::new(scheduler.start(), 0.1, 0.0);
        assert!(!task.poll(&scheduler, 0.05));
        assert!(task.poll(&scheduler, 0.1));
        assert!(!task.poll(&scheduler, 0.15));
        // A long stall fires once, not five times
        assert!(task.poll(&scheduler, 0.72));
        assert!(!task.poll(&scheduler, 0.78));
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = RefreshScheduler::new();
        let mut task = RefreshTask::new(scheduler.start(), 0.1, 0.0);
        scheduler.cancel();
        assert!(!task.poll(&scheduler, 10.0));
        assert_eq!(scheduler.active(), None);
    }

    #[test]
    fn test_poll_after_huge_stall_returns_once() {
        let mut scheduler = RefreshScheduler::new();
        let mut task = RefreshTask::new(scheduler.start(), 0.125, 0.0);
        assert!(task.poll(&scheduler, 3.0e6));
        assert!(!task.poll(&scheduler, 3.0e6 + 0.0625));
        assert!(task.poll(&scheduler, 3.0e6 + 0.125));
    }

    #[test]
    fn test_non_finite_time_never_fires() {
        let mut scheduler = RefreshScheduler::new();
        let mut task = RefreshTask::new(scheduler.start(), 0.1, 0.0);
        assert!(!task.poll(&scheduler, f64::NAN));
        assert!(task.poll(&scheduler, 0.1));
    }
}
