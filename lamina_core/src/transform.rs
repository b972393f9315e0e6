// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2-D affine layer transforms with hardware-oriented classification.
//!
//! [`LayerTransform`] wraps a [`kurbo::Affine`] and adds the queries the
//! compositor asks of it: what *kind* of transform it is, whether it keeps
//! axis-aligned rectangles axis-aligned, and which flip/rotation it reduces
//! to for a hardware plane.

use core::ops::Mul;

use bitflags::bitflags;
use kurbo::{Affine, Point, Vec2};

use crate::orientation::Orientation;
use crate::rect::PixelRect;

const EPSILON: f64 = 1e-7;

bitflags! {
    /// Coarse classification of a transform.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TransformKind: u8 {
        /// Has a non-zero translation.
        const TRANSLATE = 0x01;
        /// Rotates by a multiple of 90°.
        const ROTATE = 0x02;
        /// Scales, or flips along a single axis.
        const SCALE = 0x04;
        /// Skews or rotates by an arbitrary angle.
        const UNKNOWN = 0x08;
    }
}

/// The 2×2 linear part of a layer transform, as set by clients.
///
/// A point `(x, y)` maps to `(dsdx * x + dsdy * y, dtdx * x + dtdy * y)`
/// before translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix22 {
    /// Derivative of output x with respect to input x.
    pub dsdx: f64,
    /// Derivative of output y with respect to input x.
    pub dtdx: f64,
    /// Derivative of output x with respect to input y.
    pub dsdy: f64,
    /// Derivative of output y with respect to input y.
    pub dtdy: f64,
}

impl Matrix22 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Creates a matrix from its four entries.
    #[inline]
    #[must_use]
    pub const fn new(dsdx: f64, dtdx: f64, dsdy: f64, dtdy: f64) -> Self {
        Self {
            dsdx,
            dtdx,
            dsdy,
            dtdy,
        }
    }
}

/// A 2-D affine transform applied to a layer or a display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerTransform {
    affine: Affine,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LayerTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        affine: Affine::IDENTITY,
    };

    /// Wraps an existing affine.
    #[inline]
    #[must_use]
    pub const fn from_affine(affine: Affine) -> Self {
        Self { affine }
    }

    /// A pure translation.
    #[inline]
    #[must_use]
    pub fn from_translation(x: f64, y: f64) -> Self {
        Self::from_affine(Affine::translate((x, y)))
    }

    /// Builds the transform for a flip/rotation into a destination space of
    /// `width` by `height`.
    ///
    /// `width` and `height` describe the space *after* the orientation is
    /// applied, which is how display rotations are configured. Returns `None`
    /// for [`Orientation::ROT_INVALID`].
    #[must_use]
    pub fn from_orientation(orientation: Orientation, width: f64, height: f64) -> Option<Self> {
        if !orientation.is_valid() {
            return None;
        }
        let (mut w, mut h) = (width, height);
        if orientation.contains(Orientation::ROT_90) {
            core::mem::swap(&mut w, &mut h);
        }
        let mut flips = Affine::IDENTITY;
        if orientation.contains(Orientation::FLIP_V) {
            flips = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, h]) * flips;
        }
        if orientation.contains(Orientation::FLIP_H) {
            flips = Affine::new([-1.0, 0.0, 0.0, 1.0, w, 0.0]) * flips;
        }
        if orientation.contains(Orientation::ROT_90) {
            // (x, y) -> (h_src - y, x); after the swap `h` holds that height.
            flips = Affine::new([0.0, 1.0, -1.0, 0.0, h, 0.0]) * flips;
        }
        Some(Self::from_affine(flips))
    }

    /// Returns the wrapped affine.
    #[inline]
    #[must_use]
    pub const fn affine(self) -> Affine {
        self.affine
    }

    /// Returns the translation component.
    #[inline]
    #[must_use]
    pub fn translation(self) -> Vec2 {
        self.affine.translation()
    }

    /// Returns a copy with the translation replaced.
    #[must_use]
    pub fn with_translation(self, x: f64, y: f64) -> Self {
        Self::from_affine(self.affine.with_translation(Vec2::new(x, y)))
    }

    /// Returns the 2×2 linear part.
    #[must_use]
    pub fn matrix(self) -> Matrix22 {
        let [a, b, c, d, _, _] = self.affine.as_coeffs();
        Matrix22::new(a, b, c, d)
    }

    /// Returns a copy with the 2×2 linear part replaced and the translation
    /// kept.
    #[must_use]
    pub fn with_matrix(self, m: Matrix22) -> Self {
        let [_, _, _, _, e, f] = self.affine.as_coeffs();
        Self::from_affine(Affine::new([m.dsdx, m.dtdx, m.dsdy, m.dtdy, e, f]))
    }

    /// Reduces the linear part to flips and a 90° rotation, or
    /// [`Orientation::ROT_INVALID`] when that is not possible.
    #[must_use]
    pub fn orientation(self) -> Orientation {
        self.classify().0
    }

    /// Classifies the transform.
    #[must_use]
    pub fn kind(self) -> TransformKind {
        let (orientation, scales) = self.classify();
        let mut kind = TransformKind::empty();
        if !orientation.is_valid() {
            kind |= TransformKind::UNKNOWN;
        } else if orientation.contains(Orientation::ROT_90)
            || orientation.contains(Orientation::ROT_180)
        {
            kind |= TransformKind::ROTATE;
        } else {
            // A single-axis flip is a negative scale.
            if orientation.contains(Orientation::FLIP_H) {
                kind ^= TransformKind::SCALE;
            }
            if orientation.contains(Orientation::FLIP_V) {
                kind ^= TransformKind::SCALE;
            }
        }
        if scales && orientation.is_valid() {
            kind |= TransformKind::SCALE;
        }
        let t = self.translation();
        if !is_zero(t.x) || !is_zero(t.y) {
            kind |= TransformKind::TRANSLATE;
        }
        kind
    }

    /// Returns `true` if axis-aligned rects map to axis-aligned rects.
    #[inline]
    #[must_use]
    pub fn preserves_rects(self) -> bool {
        self.orientation().is_valid()
    }

    /// Returns `true` if sampling through this transform is not pixel exact.
    #[must_use]
    pub fn needs_filtering(self) -> bool {
        !self.preserves_rects() || self.kind().contains(TransformKind::SCALE)
    }

    /// Maps a point.
    #[inline]
    #[must_use]
    pub fn map_point(self, p: Point) -> Point {
        self.affine * p
    }

    /// Maps a rect and returns the rounded integer bounding box of the result.
    #[must_use]
    pub fn map_rect(self, r: PixelRect) -> PixelRect {
        PixelRect::from_kurbo_rounded(self.affine.transform_rect_bbox(r.to_kurbo()))
    }

    /// The inverse transform, or `None` if the transform is singular.
    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        let det = self.affine.determinant();
        if is_zero(det) || !det.is_finite() {
            return None;
        }
        Some(Self::from_affine(self.affine.inverse()))
    }

    fn classify(self) -> (Orientation, bool) {
        let [a, b, c, d, _, _] = self.affine.as_coeffs();
        let mut orientation = Orientation::empty();
        let scales;
        if is_zero(b) && is_zero(c) {
            if a < 0.0 {
                orientation |= Orientation::FLIP_H;
            }
            if d < 0.0 {
                orientation |= Orientation::FLIP_V;
            }
            scales = !is_one(a) || !is_one(d);
        } else if is_zero(a) && is_zero(d) {
            orientation |= Orientation::ROT_90;
            if c > 0.0 {
                orientation |= Orientation::FLIP_V;
            }
            if b < 0.0 {
                orientation |= Orientation::FLIP_H;
            }
            scales = !is_one(b) || !is_one(c);
        } else {
            orientation = Orientation::ROT_INVALID;
            scales = true;
        }
        (orientation, scales)
    }
}

impl Mul for LayerTransform {
    type Output = Self;

    /// Composes two transforms; `rhs` is applied first.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_affine(self.affine * rhs.affine)
    }
}

#[inline]
fn is_zero(v: f64) -> bool {
    v.abs() <= EPSILON
}

#[inline]
fn is_one(v: f64) -> bool {
    is_zero(v.abs() - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_plain() {
        let t = LayerTransform::IDENTITY;
        assert_eq!(t.kind(), TransformKind::empty());
        assert_eq!(t.orientation(), Orientation::ROT_0);
        assert!(t.preserves_rects());
        assert!(!t.needs_filtering());
    }

    #[test]
    fn translation_only_sets_translate() {
        let t = LayerTransform::from_translation(10.0, -3.0);
        assert_eq!(t.kind(), TransformKind::TRANSLATE);
        assert_eq!(
            t.map_rect(PixelRect::new(0, 0, 5, 5)),
            PixelRect::new(10, -3, 15, 2)
        );
    }

    #[test]
    fn single_flip_is_a_scale() {
        let t = LayerTransform::IDENTITY.with_matrix(Matrix22::new(-1.0, 0.0, 0.0, 1.0));
        assert_eq!(t.orientation(), Orientation::FLIP_H);
        assert_eq!(t.kind(), TransformKind::SCALE);
    }

    #[test]
    fn both_flips_are_a_rotation() {
        let t = LayerTransform::IDENTITY.with_matrix(Matrix22::new(-1.0, 0.0, 0.0, -1.0));
        assert_eq!(t.orientation(), Orientation::ROT_180);
        assert_eq!(t.kind(), TransformKind::ROTATE);
    }

    #[test]
    fn quarter_turn_classifies_as_rot_90() {
        let rot = LayerTransform::from_affine(Affine::rotate(core::f64::consts::FRAC_PI_2));
        // kurbo rounds cos(pi/2) to ~6e-17, well under the epsilon.
        assert_eq!(rot.orientation(), Orientation::ROT_90);
        assert!(rot.kind().contains(TransformKind::ROTATE));
        assert!(rot.preserves_rects());
    }

    #[test]
    fn arbitrary_rotation_is_unknown() {
        let t = LayerTransform::from_affine(Affine::rotate(0.3));
        assert_eq!(t.orientation(), Orientation::ROT_INVALID);
        assert!(t.kind().contains(TransformKind::UNKNOWN));
        assert!(!t.preserves_rects());
        assert!(t.needs_filtering());
    }

    #[test]
    fn uniform_scale_needs_filtering() {
        let t = LayerTransform::IDENTITY.with_matrix(Matrix22::new(2.0, 0.0, 0.0, 2.0));
        assert_eq!(t.kind(), TransformKind::SCALE);
        assert!(t.needs_filtering());
    }

    #[test]
    fn with_matrix_keeps_translation() {
        let t = LayerTransform::from_translation(4.0, 5.0)
            .with_matrix(Matrix22::new(0.0, 1.0, -1.0, 0.0));
        assert_eq!(t.translation(), Vec2::new(4.0, 5.0));
        assert_eq!(t.matrix(), Matrix22::new(0.0, 1.0, -1.0, 0.0));
    }

    #[test]
    fn display_rotation_maps_into_destination() {
        // A 100x50 panel shown rotated: destination is 50 wide, 100 tall.
        let t = LayerTransform::from_orientation(Orientation::ROT_90, 50.0, 100.0)
            .expect("valid orientation");
        assert_eq!(t.orientation(), Orientation::ROT_90);
        assert_eq!(
            t.map_rect(PixelRect::new(0, 0, 100, 50)),
            PixelRect::new(0, 0, 50, 100)
        );
        assert_eq!(t.map_point(Point::new(0.0, 0.0)), Point::new(50.0, 0.0));
    }

    #[test]
    fn orientation_transform_agrees_with_rect_orientation() {
        let r = PixelRect::new(3, 4, 20, 9);
        for o in [
            Orientation::FLIP_H,
            Orientation::FLIP_V,
            Orientation::ROT_90,
            Orientation::ROT_180,
            Orientation::ROT_270,
        ] {
            let (dw, dh) = if o.swaps_axes() { (40, 30) } else { (30, 40) };
            let t = LayerTransform::from_orientation(o, f64::from(dw), f64::from(dh))
                .expect("valid orientation");
            assert_eq!(t.orientation(), o, "classification of {o:?}");
            assert_eq!(t.map_rect(r), r.oriented(o, 30, 40), "mapping of {o:?}");
        }
    }

    #[test]
    fn invalid_orientation_has_no_transform() {
        assert!(LayerTransform::from_orientation(Orientation::ROT_INVALID, 1.0, 1.0).is_none());
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let t = LayerTransform::IDENTITY.with_matrix(Matrix22::new(0.0, 0.0, 0.0, 0.0));
        assert!(t.inverse().is_none());
        let t = LayerTransform::from_translation(2.0, 3.0);
        let inv = t.inverse().expect("invertible");
        assert_eq!(inv.translation(), Vec2::new(-2.0, -3.0));
    }
}
