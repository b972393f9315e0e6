// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps a copy of every event
//! together with the time it arrived, in nanoseconds since the recorder was
//! created. Lamina events are small `Copy` values, so they are stored as is.

use std::time::Instant;

use lamina_core::time::HostTime;
use lamina_core::trace::{FramePresentedEvent, LatchEvent, TraceSink, TransactionEvent};

/// One recorded event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A layer committed its pending state.
    Transaction(TransactionEvent),
    /// A layer tried to latch a buffer.
    Latch(LatchEvent),
    /// A latched frame reached the screen.
    FramePresented(FramePresentedEvent),
}

/// A [`RecordedEvent`] and when the recorder received it.
#[derive(Clone, Copy, Debug)]
pub struct Recorded {
    /// Arrival time, nanoseconds since the recorder started.
    pub at: HostTime,
    /// The event.
    pub event: RecordedEvent,
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug)]
pub struct RecorderSink {
    start: Instant,
    events: Vec<Recorded>,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder whose clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Records an event with an explicit arrival time.
    pub fn record_at(&mut self, at: HostTime, event: RecordedEvent) {
        self.events.push(Recorded { at, event });
    }

    /// Returns the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Recorded] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<Recorded> {
        self.events
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn now(&self) -> HostTime {
        let nanos = self.start.elapsed().as_nanos();
        HostTime(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    fn record(&mut self, event: RecordedEvent) {
        let at = self.now();
        self.record_at(at, event);
    }
}

impl TraceSink for RecorderSink {
    fn on_transaction(&mut self, e: &TransactionEvent) {
        self.record(RecordedEvent::Transaction(*e));
    }

    fn on_latch(&mut self, e: &LatchEvent) {
        self.record(RecordedEvent::Latch(*e));
    }

    fn on_frame_presented(&mut self, e: &FramePresentedEvent) {
        self.record(RecordedEvent::FramePresented(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::layer::{LatchOutcome, Layer, LayerIdAllocator, LayerInit};
    use lamina_core::trace::Tracer;

    #[test]
    fn records_in_arrival_order() {
        let ids = LayerIdAllocator::new();
        let mut layer = Layer::new(ids.allocate(), &LayerInit::new(8, 8));
        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            assert!(layer.set_position(1.0, 2.0), "position changed");
            let flags = layer.handle_transaction().expect("transaction pending");
            tracer.transaction(&TransactionEvent::new(&layer, flags));
            tracer.latch(&LatchEvent::new(&layer, &LatchOutcome::default()));
        }

        let events = rec.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].event, RecordedEvent::Transaction(e) if e.sequence == 1));
        assert!(matches!(events[1].event, RecordedEvent::Latch(e) if e.buffer.is_none()));
        assert!(events[0].at <= events[1].at, "clock is monotonic");
    }

    #[test]
    fn clear_forgets_events() {
        let ids = LayerIdAllocator::new();
        let layer = Layer::new(ids.allocate(), &LayerInit::new(8, 8));
        let mut rec = RecorderSink::new();
        rec.record_at(
            HostTime(5),
            RecordedEvent::Latch(LatchEvent::new(&layer, &LatchOutcome::default())),
        );
        assert_eq!(rec.events().len(), 1);
        rec.clear();
        assert!(rec.events().is_empty());
    }
}
