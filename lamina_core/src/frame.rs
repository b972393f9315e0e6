// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Producer-side frame notification.
//!
//! A producer that queues a buffer calls
//! [`FrameNotifier::on_frame_available`]. That bumps an atomic counter of
//! frames the layer has not latched yet and wakes the compositor through an
//! [`UpdateSignal`]. Nothing on this path takes a lock, so it is safe to call
//! from any thread, including while the compositor holds the layer.

use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Wakes the compositor when a layer has new content.
pub trait UpdateSignal: Send + Sync {
    /// Schedules a pass that will latch pending buffers.
    fn signal_layer_update(&self);
}

/// An [`UpdateSignal`] that raises a flag for a polling compositor loop.
#[derive(Debug, Default)]
pub struct WakeFlag {
    raised: AtomicBool,
}

impl WakeFlag {
    /// Creates a lowered flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Lowers the flag and returns whether it was raised.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Returns whether the flag is raised without lowering it.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

impl UpdateSignal for WakeFlag {
    fn signal_layer_update(&self) {
        self.raised.store(true, Ordering::Release);
    }
}

/// Count of queued-but-unlatched frames plus the wakeup to send on arrival.
pub(crate) struct FrameQueue {
    queued: AtomicU32,
    signal: Arc<dyn UpdateSignal>,
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("queued", &self.queued.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl FrameQueue {
    pub(crate) fn new(signal: Arc<dyn UpdateSignal>) -> Self {
        Self {
            queued: AtomicU32::new(0),
            signal,
        }
    }

    pub(crate) fn queued(&self) -> u32 {
        self.queued.load(Ordering::Acquire)
    }

    /// Consumes one queued frame. Returns the count before the decrement.
    ///
    /// Never goes below zero.
    pub(crate) fn consume_one(&self) -> u32 {
        match self
            .queued
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(prev) | Err(prev) => prev,
        }
    }

    pub(crate) fn signal(&self) {
        self.signal.signal_layer_update();
    }
}

/// The producer's handle for announcing new frames to a layer.
#[derive(Clone, Debug)]
pub struct FrameNotifier {
    pub(crate) queue: Arc<FrameQueue>,
}

impl FrameNotifier {
    /// Records one newly queued frame and wakes the compositor.
    pub fn on_frame_available(&self) {
        self.queue.queued.fetch_add(1, Ordering::AcqRel);
        self.queue.signal();
    }

    /// Frames announced but not yet latched.
    #[must_use]
    pub fn queued_frames(&self) -> u32 {
        self.queue.queued()
    }
}
