// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display projection.
//!
//! A [`DisplayProjection`] describes how one display shows a layer stack:
//! which stack it shows, which part of layer-stack space is visible (the
//! viewport), and the transform from layer-stack space into display pixels.
//! The compositor owns displays; layers only read projections while
//! computing geometry.

use core::fmt;

use crate::orientation::Orientation;
use crate::rect::PixelRect;
use crate::transform::LayerTransform;

/// Identifies a group of layers shown together on one or more displays.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LayerStack(pub u32);

impl fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerStack({})", self.0)
    }
}

/// The read-only view of a display used for layer geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayProjection {
    /// Which layer stack this display shows.
    pub layer_stack: LayerStack,
    /// Layer-stack space to display pixels.
    pub transform: LayerTransform,
    /// Visible part of layer-stack space.
    pub viewport: PixelRect,
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// The display asks for filtered sampling regardless of its transform.
    pub filtering: bool,
}

impl DisplayProjection {
    /// An unrotated display of the given size whose viewport covers the whole
    /// panel and which shows layer stack 0.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            layer_stack: LayerStack(0),
            transform: LayerTransform::IDENTITY,
            viewport: PixelRect::from_size(width, height),
            width,
            height,
            filtering: false,
        }
    }

    /// A display of `width` by `height` pixels showing layer-stack content
    /// through `orientation`.
    ///
    /// The viewport covers the unrotated content space. Returns `None` for
    /// [`Orientation::ROT_INVALID`].
    #[must_use]
    pub fn oriented(width: u32, height: u32, orientation: Orientation) -> Option<Self> {
        let transform =
            LayerTransform::from_orientation(orientation, f64::from(width), f64::from(height))?;
        let viewport = if orientation.swaps_axes() {
            PixelRect::from_size(height, width)
        } else {
            PixelRect::from_size(width, height)
        };
        Some(Self {
            transform,
            viewport,
            ..Self::new(width, height)
        })
    }

    /// Returns a copy showing `layer_stack`.
    #[must_use]
    pub const fn with_layer_stack(mut self, layer_stack: LayerStack) -> Self {
        self.layer_stack = layer_stack;
        self
    }

    /// Returns a copy with a different viewport.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: PixelRect) -> Self {
        self.viewport = viewport;
        self
    }

    /// Returns a copy with a different layer-stack-to-display transform.
    #[must_use]
    pub const fn with_transform(mut self, transform: LayerTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Returns a copy that does or does not request filtered sampling.
    #[must_use]
    pub const fn with_filtering(mut self, filtering: bool) -> Self {
        self.filtering = filtering;
        self
    }

    /// Returns `true` if the display requests filtering or its transform
    /// resamples content.
    #[must_use]
    pub fn needs_filtering(&self) -> bool {
        self.filtering || self.transform.needs_filtering()
    }

    /// The full display rect in display pixels.
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }
}
