//! Set of live traps, used to push production-rate changes to every running timer.
use std::collections::BTreeSet;
use std::time::Duration;

use tracing::info;

use crate::schedule::{TickScheduler, TrapId};

/// Live trap handles. Owned by a [`crate::system::TrapSystem`], not global.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    members: BTreeSet<TrapId>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, trap: TrapId) -> bool {
        self.members.insert(trap)
    }

    pub fn remove(&mut self, trap: TrapId) -> bool {
        self.members.remove(&trap)
    }

    pub fn contains(&self, trap: TrapId) -> bool {
        self.members.contains(&trap)
    }

    pub fn iter(&self) -> impl Iterator<Item = TrapId> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Cancels and restarts every member's timer so its next tick lands one `interval`
    /// from now. Returns the number of timers restarted.
    pub fn broadcast_interval(
        &self,
        interval: Duration,
        scheduler: &mut dyn TickScheduler,
    ) -> usize {
        for trap in &self.members {
            scheduler.cancel(*trap);
            scheduler.start(*trap, interval, interval);
        }
        info!(
            "Production interval set to {:?} for {} traps.",
            interval,
            self.members.len()
        );
        self.members.len()
    }
}
