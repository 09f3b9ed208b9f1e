//! Optional debug sink threaded through the orchestrator.
//!
//! Components report coarse decisions (row direction, per-segment results,
//! post-processing deltas, final metrics). The sink is invoked synchronously;
//! the no-op implementation makes a disabled sink free.

use crate::model::PlacementMetrics;

/// One step of the engine, reported as it happens.
#[derive(Debug, Clone)]
pub enum DebugEvent {
    /// An aperture was rejected by the input filter.
    ApertureRejected {
        index: usize,
        area_mm2: f64,
        reason: &'static str,
    },
    /// A row is about to be packed.
    RowDecision {
        row: usize,
        direction: &'static str,
        components: usize,
        adaptive: bool,
    },
    /// One connected component of a row was packed.
    SegmentPacking {
        row: usize,
        segment: usize,
        standards: usize,
        customs: usize,
    },
    /// A post-processing pass finished.
    PostProcessStep {
        step: &'static str,
        standards: usize,
        customs: usize,
    },
    /// Final metrics for the invocation.
    Metrics(PlacementMetrics),
}

/// Receiver for [`DebugEvent`]s. Implementations must be cheap; the engine
/// calls them inline.
pub trait DebugSink {
    fn record(&self, event: &DebugEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DebugSink for NullSink {
    #[inline]
    fn record(&self, _event: &DebugEvent) {}
}

/// Sink that stores events for later inspection. Useful in tests and hosts
/// that surface the engine's reasoning.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: std::cell::RefCell<Vec<DebugEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<DebugEvent> {
        self.events.take()
    }
}

impl DebugSink for CollectingSink {
    fn record(&self, event: &DebugEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
