//! Event types and sinks for observing trap activity.
//!
//! This module defines [`TrapEvent`] and a set of sinks to emit, collect, or forward
//! events while driving a [`crate::system::TrapSystem`] through its `*_with_events`
//! operations.
use std::time::Duration;

use crate::biome::Biome;
use crate::conversion::registry::RebuildReport;
use crate::schedule::TrapId;
use crate::trap::TickOutcome;

/// Describes events emitted by the trap system.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum TrapEvent {
    /// Emitted when a trap enters its tick loop.
    TrapSpawned {
        trap: TrapId,
        /// Biome resolved once at spawn.
        biome: Biome,
    },

    /// Emitted when a trap is removed and its timer cancelled.
    TrapDespawned { trap: TrapId },

    /// Emitted after every tick, including ticks that changed nothing.
    TickEvaluated { trap: TrapId, outcome: TickOutcome },

    /// Emitted after the conversion registry was rebuilt from a catalog.
    RegistryRebuilt { report: RebuildReport },

    /// Emitted when a new production interval was pushed to all live traps.
    ProductionRateChanged {
        interval: Duration,
        /// Number of timers restarted.
        traps: usize,
    },

    /// Non-fatal warning (rejected config reload, skipped fixed rule, ...).
    Warning {
        /// Context string (e.g. `config`, `registry`).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of a [`TrapEvent`], for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrapEventKind {
    TrapSpawned,
    TrapDespawned,
    TickEvaluated,
    RegistryRebuilt,
    ProductionRateChanged,
    Warning,
}

impl TrapEvent {
    pub fn kind(&self) -> TrapEventKind {
        match self {
            TrapEvent::TrapSpawned { .. } => TrapEventKind::TrapSpawned,
            TrapEvent::TrapDespawned { .. } => TrapEventKind::TrapDespawned,
            TrapEvent::TickEvaluated { .. } => TrapEventKind::TickEvaluated,
            TrapEvent::RegistryRebuilt { .. } => TrapEventKind::RegistryRebuilt,
            TrapEvent::ProductionRateChanged { .. } => TrapEventKind::ProductionRateChanged,
            TrapEvent::Warning { .. } => TrapEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`TrapEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: TrapEvent);

    /// Whether events of `kind` should be built at all. Defaults to `true`.
    fn wants(&self, _kind: TrapEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = TrapEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: TrapEvent) {}

    #[inline]
    fn wants(&self, _kind: TrapEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(TrapEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(TrapEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(TrapEvent),
{
    #[inline]
    fn send(&mut self, event: TrapEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<TrapEvent>,
    only: Option<Vec<TrapEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only events of the listed kinds.
    pub fn only(kinds: impl IntoIterator<Item = TrapEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<TrapEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[TrapEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: TrapEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: TrapEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: TrapEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|i| self.sinks[*i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: TrapEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
