// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The double-buffered per-layer state.

use bitflags::bitflags;

use crate::display::LayerStack;
use crate::rect::PixelRect;
use crate::region::Region;
use crate::transform::LayerTransform;

bitflags! {
    /// Flags carried in [`LayerState`] and changed through
    /// [`Layer::set_flags`](super::Layer::set_flags).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StateFlags: u32 {
        /// The layer is not shown.
        const HIDDEN = 0x01;
    }
}

bitflags! {
    /// Flags fixed at layer creation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CreateFlags: u32 {
        /// Start hidden.
        const HIDDEN = 0x04;
        /// Content must not be captured.
        const SECURE = 0x80;
        /// Content alpha is not premultiplied.
        const NON_PREMULTIPLIED = 0x100;
        /// Content is fully opaque regardless of its pixel format.
        const OPAQUE = 0x400;
    }
}

/// Window size and window-space crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Geometry {
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
    /// Crop in window coordinates; an empty crop means "no crop".
    pub crop: PixelRect,
}

impl Geometry {
    /// Geometry of the given size with no crop.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            crop: PixelRect::INVALID,
        }
    }

    /// The full window rect.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    /// Returns `true` if the sizes match, ignoring the crop.
    #[inline]
    #[must_use]
    pub const fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// One snapshot of everything a client can change about a layer.
///
/// A layer holds two: the pending (current) state that mutators write, and
/// the drawing state that composition reads. `active` is what composition
/// uses; `requested` is what the client asked for and may lag behind while
/// a resize waits for a matching buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerState {
    /// Geometry in effect.
    pub active: Geometry,
    /// Geometry the client asked for.
    pub requested: Geometry,
    /// Stacking order; larger is closer to the viewer.
    pub z: u32,
    /// Group of layers this layer is shown with.
    pub layer_stack: LayerStack,
    /// Plane alpha, 255 is opaque.
    pub alpha: u8,
    /// Client-visible flags.
    pub flags: StateFlags,
    /// Window to layer-stack transform.
    pub transform: LayerTransform,
    /// Client hint of fully transparent window areas.
    pub transparent_region: Region,
    /// Bumped by every effective change.
    pub sequence: u32,
}

impl LayerState {
    /// Initial state for a window of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32, flags: StateFlags) -> Self {
        let geometry = Geometry::new(width, height);
        Self {
            active: geometry,
            requested: geometry,
            z: 0,
            layer_stack: LayerStack(0),
            alpha: u8::MAX,
            flags,
            transform: LayerTransform::IDENTITY,
            transparent_region: Region::new(),
            sequence: 0,
        }
    }

    /// Returns `true` if the hidden flag is set.
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(StateFlags::HIDDEN)
    }
}

/// Creation parameters for a [`Layer`](super::Layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerInit {
    /// Initial window width.
    pub width: u32,
    /// Initial window height.
    pub height: u32,
    /// Creation flags.
    pub flags: CreateFlags,
}

impl LayerInit {
    /// A visible, premultiplied, non-opaque layer of the given size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flags: CreateFlags::empty(),
        }
    }

    /// Returns a copy with `flags` added.
    #[must_use]
    pub const fn with_flags(mut self, flags: CreateFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }
}
