// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Producer buffers and the consumer-side source they are acquired from.
//!
//! Buffers are owned by the producer/consumer queue; a layer only holds a
//! [`BufferHandle`] describing the one it is currently showing. The queue
//! itself sits behind the [`BufferSource`] trait so the layer logic never
//! touches graphics memory directly.

use core::fmt;

use crate::orientation::Orientation;
use crate::rect::PixelRect;
use crate::time::HostTime;

/// Identifies a graphics buffer within its queue.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub u64);

impl fmt::Debug for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferId({})", self.0)
    }
}

/// A sync fence the producer signals when rendering into a buffer is done.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fence(pub i32);

impl fmt::Debug for Fence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fence({})", self.0)
    }
}

/// A graphics buffer as seen by the layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    /// Queue-local identifier.
    pub id: BufferId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// The pixel format carries no alpha channel.
    pub opaque_format: bool,
}

impl BufferHandle {
    /// Full buffer rect.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }
}

/// How a buffer whose size differs from the layer's is displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScalingMode {
    /// Show the buffer unscaled; a size change waits for a matching buffer.
    #[default]
    Freeze,
    /// Stretch the buffer to the window.
    ScaleToWindow,
    /// Crop the buffer to the window aspect, then stretch.
    ScaleCrop,
}

impl ScalingMode {
    /// Returns `true` if buffers of any size are scaled into the window.
    #[inline]
    #[must_use]
    pub const fn is_fixed_size(self) -> bool {
        !matches!(self, Self::Freeze)
    }
}

/// The newest buffer handed out by a [`BufferSource`], with its metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcquiredBuffer {
    /// The buffer itself.
    pub buffer: BufferHandle,
    /// Producer crop in buffer pixels; empty means the whole buffer.
    pub crop: PixelRect,
    /// Producer orientation (flips and 90° steps).
    pub transform: Orientation,
    /// How the buffer maps onto the window.
    pub scaling_mode: ScalingMode,
    /// Fence to wait on before reading the buffer.
    pub fence: Option<Fence>,
    /// Time the producer wants the buffer shown, if any.
    pub timestamp: Option<HostTime>,
    /// Older queued buffers skipped to reach this one.
    pub dropped: u32,
}

impl AcquiredBuffer {
    /// A buffer with no crop, no transform, freeze scaling and no fence.
    #[must_use]
    pub const fn new(buffer: BufferHandle) -> Self {
        Self {
            buffer,
            crop: PixelRect::INVALID,
            transform: Orientation::ROT_0,
            scaling_mode: ScalingMode::Freeze,
            fence: None,
            timestamp: None,
            dropped: 0,
        }
    }

    /// Buffer width and height with the producer transform applied.
    #[must_use]
    pub const fn oriented_size(&self) -> (u32, u32) {
        if self.transform.swaps_axes() {
            (self.buffer.height, self.buffer.width)
        } else {
            (self.buffer.width, self.buffer.height)
        }
    }
}

/// The consumer end of a layer's buffer queue.
///
/// The compositor calls these from the thread that latches buffers.
pub trait BufferSource {
    /// Acquires the newest queued buffer, dropping any older ones.
    ///
    /// Returns `None` if nothing new is queued. Acquiring a buffer releases
    /// the previously acquired one back to the producer.
    fn acquire_latest(&mut self) -> Option<AcquiredBuffer>;

    /// Returns a just-acquired buffer to the producer without showing it.
    ///
    /// The previously acquired buffer remains current.
    fn reject(&mut self, buffer: BufferHandle);

    /// Tells the producer which size to allocate buffers at by default.
    fn set_default_buffer_size(&mut self, width: u32, height: u32);

    /// Hands over the fence that signals when the display stops reading the
    /// current buffer.
    fn set_release_fence(&mut self, fence: Fence) {
        _ = fence;
    }
}
