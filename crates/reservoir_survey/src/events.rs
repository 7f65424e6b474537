//! Event types and sinks for observing generation and partitioning.
//!
//! This module defines [`SurveyEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while generating a grid via
//! [`crate::grid::generator::generate_with_events`] or partitioning it via
//! [`crate::partition::ReservoirFinder::partition_with_events`].
use crate::partition::TraversalStats;

/// Describes events emitted by survey operations.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum SurveyEvent {
    /// Emitted after both generation passes completed.
    GridGenerated {
        /// Edge length of the grid.
        size: usize,
        /// Draw threshold used by the seeding pass.
        probability: f64,
        /// Seed of the random stream (drawn when none was supplied).
        seed: u64,
        /// Sites active after the seeding pass.
        seeded_cells: usize,
        /// Sites active after the clustering pass.
        active_cells: usize,
    },

    /// Emitted when a partitioning run starts.
    PartitionStarted {
        /// Name of the traversal strategy.
        strategy: &'static str,
        /// Number of active cells in the input grid.
        active_cells: usize,
    },

    /// Emitted for every completed reservoir.
    ReservoirFound {
        /// Position of the reservoir in discovery order.
        index: usize,
        /// Number of cells in the reservoir.
        cells: usize,
    },

    /// Emitted when a partitioning run finishes.
    PartitionFinished {
        /// Name of the traversal strategy.
        strategy: &'static str,
        /// Number of reservoirs found.
        reservoirs: usize,
        /// Work counters collected by the strategy.
        stats: TraversalStats,
    },
}

impl SurveyEvent {
    pub fn kind(&self) -> SurveyEventKind {
        match self {
            SurveyEvent::GridGenerated { .. } => SurveyEventKind::GridGenerated,
            SurveyEvent::PartitionStarted { .. } => SurveyEventKind::PartitionStarted,
            SurveyEvent::ReservoirFound { .. } => SurveyEventKind::ReservoirFound,
            SurveyEvent::PartitionFinished { .. } => SurveyEventKind::PartitionFinished,
        }
    }
}

/// Discriminant of [`SurveyEvent`], used to filter what a sink receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurveyEventKind {
    GridGenerated,
    PartitionStarted,
    ReservoirFound,
    PartitionFinished,
}

/// A generic event sink that accepts [`SurveyEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SurveyEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: SurveyEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = SurveyEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SurveyEvent) {}

    #[inline]
    fn wants(&self, _kind: SurveyEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SurveyEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SurveyEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SurveyEvent),
{
    #[inline]
    fn send(&mut self, event: SurveyEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SurveyEvent>,
    only: Option<Vec<SurveyEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only events whose kind is listed.
    pub fn only(kinds: &[SurveyEventKind]) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.to_vec()),
        }
    }

    pub fn into_inner(self) -> Vec<SurveyEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SurveyEvent] {
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
    fn send(&mut self, event: SurveyEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: SurveyEventKind) -> bool {
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

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn into_sinks(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: SurveyEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            if sink.wants(event.kind()) {
                sink.send(event.clone());
            }
        }
        if last.wants(event.kind()) {
            last.send(event);
        }
    }

    fn wants(&self, kind: SurveyEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
