// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation bits shared by layer transforms and buffer transforms.
//!
//! The bit values match the usual hardware-composer encoding: a 90° rotation
//! is applied *after* any horizontal/vertical flips, and a 180° rotation is
//! expressed as both flips.

use bitflags::bitflags;

bitflags! {
    /// The orientation component of a transform.
    ///
    /// Producers tag each buffer with one of these (flips and 90° steps only).
    /// [`LayerTransform::orientation`](crate::transform::LayerTransform::orientation)
    /// additionally reports [`ROT_INVALID`](Self::ROT_INVALID) when the layer
    /// transform contains a skew or a rotation that is not a multiple of 90°.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Orientation: u32 {
        /// Mirror horizontally.
        const FLIP_H = 0x01;
        /// Mirror vertically.
        const FLIP_V = 0x02;
        /// Rotate 90° clockwise (applied after the flips).
        const ROT_90 = 0x04;
        /// Rotate 180°.
        const ROT_180 = Self::FLIP_H.bits() | Self::FLIP_V.bits();
        /// Rotate 270° clockwise.
        const ROT_270 = Self::ROT_180.bits() | Self::ROT_90.bits();
        /// Not expressible as flips and 90° steps.
        const ROT_INVALID = 0x80;
    }
}

impl Orientation {
    /// No rotation and no flips.
    pub const ROT_0: Self = Self::empty();

    /// Returns `true` if this orientation can be handed to a hardware plane.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !self.contains(Self::ROT_INVALID)
    }

    /// Returns `true` if the orientation swaps the width and height axes.
    #[inline]
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        self.contains(Self::ROT_90)
    }
}
