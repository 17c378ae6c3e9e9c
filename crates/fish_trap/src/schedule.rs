//! Tick scheduling for traps.
//!
//! The host implements [`TickScheduler`] over its own timer facility; the core only
//! starts and cancels repeating timers. [`TickTimers`] is a deterministic virtual-clock
//! implementation for hosts without one, tests, and benches.
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Shortest interval a timer will repeat at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle of a live trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrapId(pub u64);

impl fmt::Display for TrapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trap#{}", self.0)
    }
}

/// Repeating timer facility provided by the host.
pub trait TickScheduler {
    /// Starts (or restarts) a repeating timer: first firing after `first_delay`, then
    /// every `interval`.
    fn start(&mut self, trap: TrapId, first_delay: Duration, interval: Duration);

    fn cancel(&mut self, trap: TrapId);
}

/// A scheduler that ignores all requests, for hosts that call ticks directly.
impl TickScheduler for () {
    #[inline]
    fn start(&mut self, _trap: TrapId, _first_delay: Duration, _interval: Duration) {}

    #[inline]
    fn cancel(&mut self, _trap: TrapId) {}
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    next_due: Duration,
    interval: Duration,
}

/// Virtual-clock scheduler. Time only moves through [`TickTimers::advance`].
#[derive(Debug, Clone, Default)]
pub struct TickTimers {
    now: Duration,
    timers: BTreeMap<TrapId, Timer>,
}

impl TickTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn next_due(&self, trap: TrapId) -> Option<Duration> {
        self.timers.get(&trap).map(|t| t.next_due)
    }

    pub fn interval(&self, trap: TrapId) -> Option<Duration> {
        self.timers.get(&trap).map(|t| t.interval)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Moves the clock forward by `dt` and returns every firing that fell due, in
    /// time order (ties by trap id). A timer can fire several times in one call.
    pub fn advance(&mut self, dt: Duration) -> Vec<TrapId> {
        let target = self.now + dt;
        let mut fired = Vec::new();
        loop {
            let next = self
                .timers
                .iter()
                .filter(|(_, t)| t.next_due <= target)
                .map(|(id, t)| (*id, t.next_due))
                .min_by_key(|(id, due)| (*due, *id));
            let Some((id, due)) = next else {
                break;
            };
            if let Some(timer) = self.timers.get_mut(&id) {
                timer.next_due = due + timer.interval;
            }
            self.now = self.now.max(due);
            fired.push(id);
        }
        self.now = target;
        fired
    }
}

impl TickScheduler for TickTimers {
    fn start(&mut self, trap: TrapId, first_delay: Duration, interval: Duration) {
        self.timers.insert(
            trap,
            Timer {
                next_due: self.now.saturating_add(first_delay),
                interval: interval.max(MIN_INTERVAL),
            },
        );
    }

    fn cancel(&mut self, trap: TrapId) {
        self.timers.remove(&trap);
    }
}
