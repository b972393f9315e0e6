// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The buffer queue facet: latching the newest buffer once per pass.
//!
//! The compositor calls, per pass and in this order,
//! [`Layer::latch_buffer`], composition, [`Layer::on_pre_composition`]
//! before the next pass, and [`Layer::on_post_composition`] once the frame
//! is on screen. A layer latches at most one buffer until
//! `on_pre_composition` clears its refresh-pending mark.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::buffer::{AcquiredBuffer, BufferHandle, BufferSource, Fence, ScalingMode};
use crate::frame::FrameQueue;
use crate::orientation::Orientation;
use crate::rect::PixelRect;
use crate::region::Region;
use crate::stats::{FrameRecord, FrameStats, FrameTracker};
use crate::time::HostTime;
use crate::transaction::CommitFlags;

use super::{CreateFlags, Layer, LayerState};

/// Result of [`Layer::latch_buffer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LatchOutcome {
    /// Layer-stack area that needs repainting.
    pub dirty: Region,
    /// Screen coverage may have changed.
    pub recompute_visible_regions: bool,
}

/// Consumer-side state of a layer's buffer queue.
pub struct BufferState {
    queue: Arc<FrameQueue>,
    source: Box<dyn BufferSource + Send>,
    active_buffer: Option<BufferHandle>,
    crop: PixelRect,
    transform: Orientation,
    scaling_mode: ScalingMode,
    fence: Option<Fence>,
    timestamp: Option<HostTime>,
    refresh_pending: bool,
    frame_latency_needed: bool,
    frames_dropped: u64,
    tracker: FrameTracker,
}

impl fmt::Debug for BufferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferState")
            .field("queued_frames", &self.queued_frames())
            .field("active_buffer", &self.active_buffer)
            .field("crop", &self.crop)
            .field("transform", &self.transform)
            .field("scaling_mode", &self.scaling_mode)
            .field("refresh_pending", &self.refresh_pending)
            .field("frames_dropped", &self.frames_dropped)
            .finish_non_exhaustive()
    }
}

impl BufferState {
    pub(super) fn new(queue: Arc<FrameQueue>, source: Box<dyn BufferSource + Send>) -> Self {
        Self {
            queue,
            source,
            active_buffer: None,
            crop: PixelRect::INVALID,
            transform: Orientation::ROT_0,
            scaling_mode: ScalingMode::Freeze,
            fence: None,
            timestamp: None,
            refresh_pending: false,
            frame_latency_needed: false,
            frames_dropped: 0,
            tracker: FrameTracker::new(),
        }
    }

    pub(super) fn queue(&self) -> &Arc<FrameQueue> {
        &self.queue
    }

    /// The buffer currently shown.
    #[inline]
    #[must_use]
    pub fn active_buffer(&self) -> Option<BufferHandle> {
        self.active_buffer
    }

    /// Frames announced but not latched.
    #[must_use]
    pub fn queued_frames(&self) -> u32 {
        self.queue.queued()
    }

    /// Producer crop of the shown buffer; empty when unset.
    #[inline]
    #[must_use]
    pub fn crop(&self) -> PixelRect {
        self.crop
    }

    /// Producer orientation of the shown buffer.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> Orientation {
        self.transform
    }

    /// Scaling mode of the shown buffer.
    #[inline]
    #[must_use]
    pub fn scaling_mode(&self) -> ScalingMode {
        self.scaling_mode
    }

    /// Returns `true` if buffers are scaled to the window rather than
    /// requiring a matching size.
    #[inline]
    #[must_use]
    pub fn is_fixed_size(&self) -> bool {
        self.scaling_mode.is_fixed_size()
    }

    /// Acquire fence of the shown buffer.
    #[inline]
    #[must_use]
    pub fn fence(&self) -> Option<Fence> {
        self.fence
    }

    /// Desired present time of the shown buffer.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Option<HostTime> {
        self.timestamp
    }

    /// Whether a latched buffer is waiting for composition.
    #[inline]
    #[must_use]
    pub fn refresh_pending(&self) -> bool {
        self.refresh_pending
    }

    /// Total frames the queue skipped to deliver newer ones.
    #[inline]
    #[must_use]
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Frame timing history.
    #[inline]
    #[must_use]
    pub fn frame_tracker(&self) -> &FrameTracker {
        &self.tracker
    }

    pub(super) fn content_crop(&self) -> PixelRect {
        if !self.crop.is_empty() {
            self.crop
        } else if let Some(buffer) = &self.active_buffer {
            buffer.bounds()
        } else {
            PixelRect::INVALID
        }
    }

    pub(super) fn shows_opaque(&self, create_flags: CreateFlags) -> bool {
        self.active_buffer.is_some_and(|b| {
            create_flags.contains(CreateFlags::OPAQUE) || b.opaque_format
        })
    }

    /// Buffer-queue part of a commit: pass a size change on to the
    /// producer and hold the active geometry while a resize is pending.
    pub(super) fn prepare_commit(
        &mut self,
        drawing: &LayerState,
        current: &LayerState,
    ) -> CommitFlags {
        if !current.requested.same_size(&drawing.requested) {
            self.source
                .set_default_buffer_size(current.requested.width, current.requested.height);
        }
        if !self.is_fixed_size() && !current.requested.same_size(&current.active) {
            CommitFlags::DONT_UPDATE_GEOMETRY
        } else {
            CommitFlags::empty()
        }
    }
}

/// Decides whether a freshly acquired buffer may be shown.
///
/// A pending resize completes here when the buffer is scaled to the window
/// or already has the requested size. Unscaled buffers must then match the
/// active size.
fn accept_buffer(
    drawing: &mut LayerState,
    current: &mut LayerState,
    item: &AcquiredBuffer,
    recompute: &mut bool,
) -> bool {
    let (width, height) = item.oriented_size();
    let fixed_size = item.scaling_mode.is_fixed_size();
    if drawing.active != drawing.requested
        && (fixed_size
            || (width == drawing.requested.width && height == drawing.requested.height))
    {
        drawing.active = drawing.requested;
        // Keep the pending state in step so the next commit does not undo it.
        current.active = drawing.active;
        *recompute = true;
    }
    fixed_size || (drawing.active.width == width && drawing.active.height == height)
}

impl Layer {
    /// Latches the newest queued buffer, if any.
    ///
    /// Does nothing when no frame is queued or when a latched buffer has not
    /// been composited yet. Otherwise one queued frame is consumed, the
    /// newest buffer acquired and checked against the window size. A
    /// rejected buffer goes back to the producer and the result is empty
    /// with `recompute_visible_regions` set. An accepted buffer becomes the
    /// active buffer; the result's dirty region is the whole window in
    /// layer-stack space.
    pub fn latch_buffer(&mut self) -> LatchOutcome {
        let opaque_before = self.is_opaque();
        let create_flags = self.create_flags;
        let Some(buffer) = self.buffer.as_mut() else {
            return LatchOutcome::default();
        };
        if buffer.queue.queued() == 0 || buffer.refresh_pending {
            return LatchOutcome::default();
        }

        // More frames behind this one keep the compositor awake.
        if buffer.queue.consume_one() > 1 {
            buffer.queue.signal();
        }

        let Some(item) = buffer.source.acquire_latest() else {
            return LatchOutcome::default();
        };

        let mut recompute = false;
        if !accept_buffer(&mut self.drawing, &mut self.current, &item, &mut recompute) {
            buffer.source.reject(item.buffer);
            return LatchOutcome {
                dirty: Region::new(),
                recompute_visible_regions: true,
            };
        }

        let previous = buffer.active_buffer.replace(item.buffer);
        buffer.refresh_pending = true;
        buffer.frame_latency_needed = true;
        buffer.frames_dropped += u64::from(item.dropped);
        buffer.fence = item.fence;
        buffer.timestamp = item.timestamp;

        match previous {
            None => recompute = true,
            Some(prev) if prev.width != item.buffer.width || prev.height != item.buffer.height => {
                recompute = true;
            }
            Some(_) => {}
        }

        if item.crop != buffer.crop
            || item.transform != buffer.transform
            || item.scaling_mode != buffer.scaling_mode
        {
            buffer.crop = item.crop;
            buffer.transform = item.transform;
            buffer.scaling_mode = item.scaling_mode;
            recompute = true;
        }

        if opaque_before != buffer.shows_opaque(create_flags) {
            recompute = true;
        }

        let front = &self.drawing;
        LatchOutcome {
            dirty: Region::from_rect(front.active.bounds()).transform(&front.transform),
            recompute_visible_regions: recompute,
        }
    }

    /// Marks the latched buffer as composited.
    ///
    /// Returns `true` if more frames are queued, so the caller can schedule
    /// another pass.
    pub fn on_pre_composition(&mut self) -> bool {
        match self.buffer.as_mut() {
            Some(buffer) => {
                buffer.refresh_pending = false;
                buffer.queue.queued() > 0
            }
            None => false,
        }
    }

    /// Records presentation of the last latched frame.
    ///
    /// `present_time` is when the display showed it, if known. Returns the
    /// stored record, or `None` when no latch happened since the previous
    /// call.
    pub fn on_post_composition(&mut self, present_time: Option<HostTime>) -> Option<FrameRecord> {
        let buffer = self.buffer.as_mut()?;
        if !buffer.frame_latency_needed {
            return None;
        }
        buffer.frame_latency_needed = false;
        buffer.tracker.set_desired_present(buffer.timestamp);
        buffer.tracker.set_actual_present(present_time);
        Some(buffer.tracker.advance_frame())
    }

    /// Passes the display's release fence for the shown buffer back to the
    /// producer queue. Ignored by base layers.
    pub fn set_release_fence(&mut self, fence: Fence) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.source.set_release_fence(fence);
        }
    }

    /// Summary of recent frame timing. `None` for base layers.
    #[must_use]
    pub fn frame_stats(&self) -> Option<FrameStats> {
        self.buffer.as_ref().map(|b| b.tracker.stats())
    }

    /// Forgets recorded frame timing.
    pub fn clear_frame_stats(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.tracker.clear();
        }
    }
}
