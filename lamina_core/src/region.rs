// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel regions as sets of disjoint rectangles.
//!
//! A [`Region`] is what the compositor uses for visible, covered, dirty and
//! transparent areas. It keeps a flat list of non-overlapping
//! [`PixelRect`]s; union and subtraction split rectangles into at most four
//! fragments each, which is plenty for the handful of rects a single layer
//! produces.

use alloc::vec::Vec;

use crate::rect::PixelRect;
use crate::transform::LayerTransform;

/// A set of pixels, stored as disjoint non-empty rectangles.
///
/// Equality is structural: two regions covering the same pixels with a
/// different decomposition compare unequal. Callers that use equality to
/// skip redundant work treat that as "changed".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<PixelRect>,
}

impl Region {
    /// Creates an empty region.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// A region covering a single rect. Empty rects produce an empty region.
    #[must_use]
    pub fn from_rect(rect: PixelRect) -> Self {
        let mut region = Self::new();
        region.add_rect(rect);
        region
    }

    /// Returns `true` if the region covers no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The disjoint rects making up the region.
    #[inline]
    #[must_use]
    pub fn rects(&self) -> &[PixelRect] {
        &self.rects
    }

    /// Smallest rect covering the whole region.
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        self.rects
            .iter()
            .fold(PixelRect::EMPTY, |acc, r| acc.union(*r))
    }

    /// Total number of pixels covered.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    /// Empties the region.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Adds the pixels of `rect` to the region.
    pub fn add_rect(&mut self, rect: PixelRect) {
        if rect.is_empty() {
            return;
        }
        let mut pieces = alloc::vec![rect];
        for existing in &self.rects {
            if pieces.is_empty() {
                return;
            }
            pieces = pieces
                .into_iter()
                .flat_map(|p| fragments(p, *existing))
                .collect();
        }
        self.rects.extend(pieces);
    }

    /// Adds every pixel of `other` to the region.
    pub fn union(&mut self, other: &Self) {
        for r in &other.rects {
            self.add_rect(*r);
        }
    }

    /// Removes the pixels of `rect` from the region.
    pub fn subtract_rect(&mut self, rect: PixelRect) {
        if rect.is_empty() {
            return;
        }
        let old = core::mem::take(&mut self.rects);
        self.rects = old.into_iter().flat_map(|r| fragments(r, rect)).collect();
    }

    /// Removes every pixel of `other` from the region.
    pub fn subtract(&mut self, other: &Self) {
        for r in &other.rects {
            self.subtract_rect(*r);
        }
    }

    /// The part of the region inside `rect`.
    #[must_use]
    pub fn intersect_rect(&self, rect: PixelRect) -> Self {
        Self {
            rects: self
                .rects
                .iter()
                .map(|r| r.intersect(rect))
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    /// The part of the region also covered by `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = Self::new();
        for r in &other.rects {
            out.union(&self.intersect_rect(*r));
        }
        out
    }

    /// Shifts every rect by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            rects: self.rects.iter().map(|r| r.translate(dx, dy)).collect(),
        }
    }

    /// Maps the region through a transform.
    ///
    /// Each rect is replaced by its rounded bounding box, which is exact for
    /// transforms that preserve rects and conservative otherwise.
    #[must_use]
    pub fn transform(&self, transform: &LayerTransform) -> Self {
        let mut out = Self::new();
        for r in &self.rects {
            out.add_rect(transform.map_rect(*r));
        }
        out
    }
}

impl From<PixelRect> for Region {
    fn from(rect: PixelRect) -> Self {
        Self::from_rect(rect)
    }
}

/// Returns the parts of `a` not covered by `b`, at most four rects.
fn fragments(a: PixelRect, b: PixelRect) -> Vec<PixelRect> {
    let overlap = a.intersect(b);
    if overlap.is_empty() {
        return alloc::vec![a];
    }
    let mut out = Vec::with_capacity(4);
    // Full-width bands above and below, then the side pieces of the overlap row.
    let above = PixelRect::new(a.left, a.top, a.right, overlap.top);
    let below = PixelRect::new(a.left, overlap.bottom, a.right, a.bottom);
    let left = PixelRect::new(a.left, overlap.top, overlap.left, overlap.bottom);
    let right = PixelRect::new(overlap.right, overlap.top, a.right, overlap.bottom);
    for piece in [above, below, left, right] {
        if !piece.is_empty() {
            out.push(piece);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rect_gives_empty_region() {
        assert!(Region::from_rect(PixelRect::INVALID).is_empty());
        assert!(Region::from_rect(PixelRect::EMPTY).is_empty());
    }

    #[test]
    fn union_does_not_double_count() {
        let mut r = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        r.add_rect(PixelRect::new(5, 5, 15, 15));
        assert_eq!(r.area(), 100 + 100 - 25);
        assert_eq!(r.bounds(), PixelRect::new(0, 0, 15, 15));
    }

    #[test]
    fn union_of_contained_rect_is_noop() {
        let mut r = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        let before = r.clone();
        r.add_rect(PixelRect::new(2, 2, 4, 4));
        assert_eq!(r, before);
    }

    #[test]
    fn subtract_punches_hole() {
        let mut r = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        r.subtract_rect(PixelRect::new(3, 3, 6, 6));
        assert_eq!(r.area(), 100 - 9);
        assert_eq!(r.rects().len(), 4);
        for a in r.rects() {
            assert!(!a.overlaps(PixelRect::new(3, 3, 6, 6)), "{a:?} in hole");
        }
    }

    #[test]
    fn subtract_everything_empties() {
        let mut r = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        r.subtract_rect(PixelRect::new(-1, -1, 11, 11));
        assert!(r.is_empty());
    }

    #[test]
    fn intersect_clips_to_rect() {
        let mut r = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        r.add_rect(PixelRect::new(20, 0, 30, 10));
        let clipped = r.intersect_rect(PixelRect::new(5, 0, 25, 5));
        assert_eq!(clipped.area(), 5 * 5 + 5 * 5);
    }

    #[test]
    fn region_intersection() {
        let a = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        let b = Region::from_rect(PixelRect::new(5, 5, 20, 20));
        assert_eq!(a.intersect(&b), Region::from_rect(PixelRect::new(5, 5, 10, 10)));
    }

    #[test]
    fn transform_translates_rects() {
        let r = Region::from_rect(PixelRect::new(0, 0, 4, 4));
        let moved = r.transform(&LayerTransform::from_translation(10.0, 20.0));
        assert_eq!(moved.rects(), &[PixelRect::new(10, 20, 14, 24)]);
        assert_eq!(moved, r.translate(10, 20));
    }
}
