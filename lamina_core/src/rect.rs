// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel rectangles.

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::orientation::Orientation;

/// An axis-aligned rectangle with integer edges.
///
/// Edges are half-open: the rect covers `left..right` horizontally and
/// `top..bottom` vertically. A rect whose width or height is not positive is
/// *empty*; [`PixelRect::INVALID`] is the conventional "unset" value.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl fmt::Debug for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelRect([{}, {}] - [{}, {}])",
            self.left, self.top, self.right, self.bottom
        )
    }
}

impl PixelRect {
    /// The zero-sized rect at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// An unset rect, with negative width and height.
    pub const INVALID: Self = Self::new(0, 0, -1, -1);

    /// Creates a rect from its four edges.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rect of the given size anchored at the origin.
    ///
    /// Sizes beyond `i32::MAX` are clamped to it.
    #[inline]
    #[must_use]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, clamp_extent(width), clamp_extent(height))
    }

    /// Width of the rect; negative for an invalid rect.
    #[inline]
    #[must_use]
    pub const fn width(self) -> i32 {
        self.right - self.left
    }

    /// Height of the rect; negative for an invalid rect.
    #[inline]
    #[must_use]
    pub const fn height(self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` if the rect covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Returns `true` if neither dimension is negative.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.width() >= 0 && self.height() >= 0
    }

    /// Number of pixels covered, zero if empty.
    #[must_use]
    pub fn area(self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.width()) * i64::from(self.height())
        }
    }

    /// Intersection of two rects, or [`PixelRect::EMPTY`] when they do not
    /// overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let r = Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        if r.is_empty() { Self::EMPTY } else { r }
    }

    /// Returns `true` if the two rects share at least one pixel.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        other.is_empty()
            || (self.left <= other.left
                && self.top <= other.top
                && self.right >= other.right
                && self.bottom >= other.bottom)
    }

    /// Smallest rect covering both inputs. Empty inputs are ignored.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Shifts the rect by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Converts to a floating-point rect.
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }

    /// Rounds every edge of a floating-point rect to the nearest integer,
    /// with halves rounding up.
    #[must_use]
    pub fn from_kurbo_rounded(rect: kurbo::Rect) -> Self {
        Self::new(
            round_half_up(rect.x0),
            round_half_up(rect.y0),
            round_half_up(rect.x1),
            round_half_up(rect.y1),
        )
    }

    /// Maps this rect through a buffer orientation inside a `width` by
    /// `height` space.
    ///
    /// Flips are applied first, then the 90° rotation, so a `ROT_90` result
    /// lives in a space that is `height` wide and `width` tall.
    /// [`Orientation::ROT_INVALID`] is ignored.
    #[must_use]
    pub fn oriented(self, orientation: Orientation, width: i32, height: i32) -> Self {
        let mut r = self;
        if orientation.contains(Orientation::FLIP_H) {
            r = Self::new(width - r.right, r.top, width - r.left, r.bottom);
        }
        if orientation.contains(Orientation::FLIP_V) {
            r = Self::new(r.left, height - r.bottom, r.right, height - r.top);
        }
        if orientation.contains(Orientation::ROT_90) {
            r = Self::new(height - r.bottom, r.left, height - r.top, r.right);
        }
        r
    }
}

const fn clamp_extent(v: u32) -> i32 {
    if v > i32::MAX as u32 {
        i32::MAX
    } else {
        v as i32
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates are rounded into i32 range by construction"
)]
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_is_empty_and_not_valid() {
        assert!(PixelRect::INVALID.is_empty());
        assert!(!PixelRect::INVALID.is_valid());
        assert!(PixelRect::EMPTY.is_valid());
    }

    #[test]
    fn oversized_extent_clamps() {
        let r = PixelRect::from_size(u32::MAX, 10);
        assert_eq!(r, PixelRect::new(0, 0, i32::MAX, 10));
        assert!(r.is_valid());
        assert!(!r.is_empty());
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(20, 20, 30, 30);
        assert_eq!(a.intersect(b), PixelRect::EMPTY);
        assert!(!a.overlaps(b));
    }

    #[test]
    fn intersection_clips_edges() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(5, -5, 15, 8);
        assert_eq!(a.intersect(b), PixelRect::new(5, 0, 10, 8));
    }

    #[test]
    fn rounding_goes_half_up() {
        let r = PixelRect::from_kurbo_rounded(kurbo::Rect::new(0.5, -0.5, 2.49, 3.5));
        assert_eq!(r, PixelRect::new(1, 0, 2, 4));
    }

    #[test]
    fn flip_h_mirrors_inside_width() {
        let r = PixelRect::new(1, 2, 3, 4);
        assert_eq!(
            r.oriented(Orientation::FLIP_H, 10, 20),
            PixelRect::new(7, 2, 9, 4)
        );
    }

    #[test]
    fn rot_90_swaps_axes() {
        let r = PixelRect::new(0, 0, 100, 50);
        let out = r.oriented(Orientation::ROT_90, 100, 50);
        assert_eq!(out, PixelRect::new(0, 0, 50, 100));
    }

    #[test]
    fn rot_90_of_sub_rect() {
        // Top-left 10x5 corner lands on the top-right after a clockwise turn.
        let r = PixelRect::new(0, 0, 10, 5);
        assert_eq!(
            r.oriented(Orientation::ROT_90, 100, 50),
            PixelRect::new(45, 0, 50, 10)
        );
    }
}
