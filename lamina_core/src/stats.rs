// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer frame timing history.
//!
//! [`FrameTracker`] is a fixed-size ring of [`FrameRecord`]s. The layer fills
//! in the pending record while a frame is in flight and advances the ring
//! once the frame has been presented.

use alloc::vec::Vec;

use crate::time::{Duration, HostTime};

/// Number of frames a tracker remembers unless told otherwise.
pub const DEFAULT_FRAME_HISTORY: usize = 128;

/// Timing of one presented frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameRecord {
    /// When the producer wanted the frame shown.
    pub desired_present: Option<HostTime>,
    /// When the frame actually reached the screen.
    pub actual_present: Option<HostTime>,
}

impl FrameRecord {
    /// How late the frame was, when both times are known.
    #[must_use]
    pub fn latency(&self) -> Option<Duration> {
        Some(self.actual_present?.saturating_duration_since(self.desired_present?))
    }
}

/// Summary over the frames a [`FrameTracker`] holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames recorded.
    pub frames: usize,
    /// Frames with both timestamps.
    pub timed_frames: usize,
    /// Largest observed latency.
    pub max_latency: Option<Duration>,
    /// Mean latency over timed frames, rounded down.
    pub mean_latency: Option<Duration>,
}

/// Ring buffer of recent frame timings.
#[derive(Clone, Debug)]
pub struct FrameTracker {
    records: Vec<FrameRecord>,
    capacity: usize,
    /// Index the next completed frame is written to.
    next: usize,
    pending: FrameRecord,
}

impl Default for FrameTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTracker {
    /// A tracker holding [`DEFAULT_FRAME_HISTORY`] frames.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FRAME_HISTORY)
    }

    /// A tracker holding `capacity` frames.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "frame tracker capacity must be non-zero");
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            pending: FrameRecord::default(),
        }
    }

    /// Sets the desired present time of the in-flight frame.
    pub fn set_desired_present(&mut self, t: Option<HostTime>) {
        self.pending.desired_present = t;
    }

    /// Sets the actual present time of the in-flight frame.
    pub fn set_actual_present(&mut self, t: Option<HostTime>) {
        self.pending.actual_present = t;
    }

    /// Moves the in-flight frame into history and starts a new one.
    ///
    /// Returns the record that was stored.
    pub fn advance_frame(&mut self) -> FrameRecord {
        let done = core::mem::take(&mut self.pending);
        if self.records.len() < self.capacity {
            self.records.push(done);
        } else {
            self.records[self.next] = done;
        }
        self.next = (self.next + 1) % self.capacity;
        done
    }

    /// Forgets all history, including the in-flight frame.
    pub fn clear(&mut self) {
        self.records.clear();
        self.next = 0;
        self.pending = FrameRecord::default();
    }

    /// Number of frames in history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no frame has completed since the last clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Frames in history, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &FrameRecord> {
        let split = if self.records.len() < self.capacity {
            0
        } else {
            self.next
        };
        self.records[split..].iter().chain(&self.records[..split])
    }

    /// Summarizes the history.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        let mut stats = FrameStats {
            frames: self.records.len(),
            ..FrameStats::default()
        };
        let mut total: u128 = 0;
        for latency in self.records.iter().filter_map(FrameRecord::latency) {
            stats.timed_frames += 1;
            total += u128::from(latency.ticks());
            stats.max_latency = stats.max_latency.max(Some(latency));
        }
        if stats.timed_frames > 0 {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "the mean of u64 values fits in u64"
            )]
            let mean = (total / stats.timed_frames as u128) as u64;
            stats.mean_latency = Some(Duration(mean));
        }
        stats
    }
}
