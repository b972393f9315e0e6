// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for the layer lifecycle.
//!
//! [`TraceSink`] has one method per event with no-op defaults. The
//! compositor builds events from the values a layer operation returns and
//! hands them to a [`Tracer`], which compiles to nothing unless the `trace`
//! feature is enabled.
//!
//! ```
//! use lamina_core::layer::{Layer, LayerIdAllocator, LayerInit};
//! use lamina_core::trace::{NoopSink, Tracer, TransactionEvent};
//!
//! static IDS: LayerIdAllocator = LayerIdAllocator::new();
//! let mut layer = Layer::new(IDS.allocate(), &LayerInit::new(64, 64));
//! let mut sink = NoopSink;
//! let mut tracer = Tracer::new(&mut sink);
//!
//! layer.set_alpha(128);
//! if let Some(flags) = layer.handle_transaction() {
//!     tracer.transaction(&TransactionEvent::new(&layer, flags));
//! }
//! ```

use crate::buffer::BufferId;
use crate::layer::{Layer, LatchOutcome, LayerId};
use crate::rect::PixelRect;
use crate::stats::FrameRecord;
use crate::time::HostTime;
use crate::transaction::CommitFlags;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a layer commits pending state.
#[derive(Clone, Copy, Debug)]
pub struct TransactionEvent {
    /// The committed layer.
    pub layer: LayerId,
    /// Sequence number of the committed state.
    pub sequence: u32,
    /// Flags the commit returned.
    pub flags: CommitFlags,
    /// Whether the committed transform resamples content.
    pub needs_filtering: bool,
}

impl TransactionEvent {
    /// Describes a commit that just returned `flags`.
    #[must_use]
    pub fn new(layer: &Layer, flags: CommitFlags) -> Self {
        Self {
            layer: layer.id(),
            sequence: layer.drawing_state().sequence,
            flags,
            needs_filtering: layer.transform_needs_filtering(),
        }
    }
}

/// Emitted after a buffer latch attempt.
#[derive(Clone, Copy, Debug)]
pub struct LatchEvent {
    /// The latching layer.
    pub layer: LayerId,
    /// Buffer shown after the latch.
    pub buffer: Option<BufferId>,
    /// Frames still queued after the latch.
    pub queued_frames: u32,
    /// Total frames skipped by the queue so far.
    pub frames_dropped: u64,
    /// The latch asked for visible regions to be recomputed.
    pub recompute_visible_regions: bool,
    /// Bounds of the dirty region, in layer-stack space.
    pub dirty_bounds: PixelRect,
}

impl LatchEvent {
    /// Describes a latch that just returned `outcome`.
    #[must_use]
    pub fn new(layer: &Layer, outcome: &LatchOutcome) -> Self {
        let buffer = layer.buffer_state();
        Self {
            layer: layer.id(),
            buffer: buffer.and_then(|b| b.active_buffer()).map(|b| b.id),
            queued_frames: buffer.map_or(0, |b| b.queued_frames()),
            frames_dropped: buffer.map_or(0, |b| b.frames_dropped()),
            recompute_visible_regions: outcome.recompute_visible_regions,
            dirty_bounds: outcome.dirty.bounds(),
        }
    }
}

/// Emitted when a latched frame has been presented.
#[derive(Clone, Copy, Debug)]
pub struct FramePresentedEvent {
    /// The presenting layer.
    pub layer: LayerId,
    /// When the producer wanted the frame shown.
    pub desired_present: Option<HostTime>,
    /// When it was shown.
    pub actual_present: Option<HostTime>,
}

impl FramePresentedEvent {
    /// Describes the record returned by post-composition bookkeeping.
    #[must_use]
    pub fn new(layer: LayerId, record: &FrameRecord) -> Self {
        Self {
            layer,
            desired_present: record.desired_present,
            actual_present: record.actual_present,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives layer lifecycle events.
///
/// All methods default to no-ops.
pub trait TraceSink {
    /// Called after a commit.
    fn on_transaction(&mut self, e: &TransactionEvent) {
        _ = e;
    }

    /// Called after a latch.
    fn on_latch(&mut self, e: &LatchEvent) {
        _ = e;
    }

    /// Called when a frame reaches the screen.
    fn on_frame_presented(&mut self, e: &FramePresentedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// With the `trace` feature off every method is empty.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TransactionEvent`].
    #[inline]
    pub fn transaction(&mut self, e: &TransactionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transaction(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LatchEvent`].
    #[inline]
    pub fn latch(&mut self, e: &LatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_latch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FramePresentedEvent`].
    #[inline]
    pub fn frame_presented(&mut self, e: &FramePresentedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_presented(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use super::*;
    use crate::layer::{LayerIdAllocator, LayerInit};

    #[derive(Default)]
    struct Counting {
        transactions: usize,
        latches: usize,
    }

    impl TraceSink for Counting {
        fn on_transaction(&mut self, e: &TransactionEvent) {
            assert!(e.flags.contains(CommitFlags::VISIBLE_REGION), "alpha change is visible");
            self.transactions += 1;
        }

        fn on_latch(&mut self, _e: &LatchEvent) {
            self.latches += 1;
        }
    }

    #[test]
    fn tracer_forwards_to_sink() {
        let ids = LayerIdAllocator::new();
        let mut layer = Layer::new(ids.allocate(), &LayerInit::new(10, 10));
        let mut sink = Counting::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            assert!(layer.set_alpha(7), "alpha changed");
            let flags = layer.handle_transaction().expect("transaction pending");
            tracer.transaction(&TransactionEvent::new(&layer, flags));
            tracer.latch(&LatchEvent::new(&layer, &LatchOutcome::default()));
        }
        assert_eq!(sink.transactions, 1);
        assert_eq!(sink.latches, 1);
    }

    #[test]
    fn none_tracer_is_silent() {
        let mut tracer = Tracer::none();
        tracer.frame_presented(&FramePresentedEvent::new(
            LayerIdAllocator::new().allocate(),
            &FrameRecord::default(),
        ));
    }
}
