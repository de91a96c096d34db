//! Tick schedule tokens
//!
//! The engine owns exactly one logical timer. Installing a schedule hands
//! out a [`ScheduleHandle`] with a fresh id; the scheduler only fires a tick
//! for a handle that is still current, so a cancelled handle can never
//! fire again.

use std::time::Duration;

/// Token for one installed tick schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleHandle {
    id: u64,
    interval: Duration,
}

impl ScheduleHandle {
    /// Unique id, never reused within one engine
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Time between ticks
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// The single tick schedule of an engine
#[derive(Debug, Default)]
pub struct Schedule {
    active: Option<ScheduleHandle>,
    next_id: u64,
    cancellations: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a schedule firing every `interval`, replacing any active one
    pub fn install(&mut self, interval: Duration) -> ScheduleHandle {
        self.cancel();
        self.next_id += 1;
        let handle = ScheduleHandle {
            id: self.next_id,
            interval,
        };
        self.active = Some(handle);
        log::debug!("Installed tick schedule #{} every {:?}", handle.id, interval);
        handle
    }

    /// Cancel the active schedule, if any
    pub fn cancel(&mut self) -> Option<ScheduleHandle> {
        let cancelled = self.active.take();
        if let Some(handle) = cancelled {
            self.cancellations += 1;
            log::debug!("Cancelled tick schedule #{}", handle.id);
        }
        cancelled
    }

    /// The active handle
    pub fn active(&self) -> Option<ScheduleHandle> {
        self.active
    }

    /// Whether `handle` is still the one that should fire
    pub fn is_current(&self, handle: &ScheduleHandle) -> bool {
        self.active.as_ref() == Some(handle)
    }

    /// Number of schedules cancelled so far
    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }
}
