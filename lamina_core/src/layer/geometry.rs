// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-space geometry derived from the drawing state.
//!
//! Three coordinate spaces meet here: *window* space (the layer's own
//! `width` by `height` rect), *layer-stack* space (after the layer
//! transform), and *display* space (after the display transform). Buffer
//! pixels form a fourth space, reached from window space through the buffer
//! orientation and the content crop.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use kurbo::Point;

use crate::display::DisplayProjection;
use crate::orientation::Orientation;
use crate::rect::PixelRect;

use super::Layer;

/// Four display-space vertices of a layer quad, bottom-left origin.
///
/// Vertices run window top-left, bottom-left, bottom-right, top-right, which
/// draws as a triangle fan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerMesh {
    /// The quad corners.
    pub vertices: [Point; 4],
}

impl Layer {
    /// Window-space rect the layer draws: the active size clipped by the
    /// active crop when the crop is non-empty.
    #[must_use]
    pub fn compute_bounds(&self) -> PixelRect {
        let active = &self.drawing.active;
        let win = active.bounds();
        if active.crop.is_empty() {
            win
        } else {
            win.intersect(active.crop)
        }
    }

    /// Display-space quad for GPU composition.
    ///
    /// Corners of [`compute_bounds`](Self::compute_bounds) go through the
    /// layer transform, then the display transform, then are flipped so `y`
    /// grows upward from the bottom of the display.
    #[must_use]
    pub fn compute_geometry(&self, display: &DisplayProjection) -> LayerMesh {
        let tr = display.transform * self.drawing.transform;
        let win = self.compute_bounds().to_kurbo();
        let height = f64::from(display.height);
        let corners = [
            Point::new(win.x0, win.y0),
            Point::new(win.x0, win.y1),
            Point::new(win.x1, win.y1),
            Point::new(win.x1, win.y0),
        ];
        LayerMesh {
            vertices: corners.map(|p| {
                let q = tr.map_point(p);
                Point::new(q.x, height - q.y)
            }),
        }
    }

    /// Area of the buffer scaled onto the window, in buffer pixels.
    ///
    /// For a buffer-backed layer this is the producer crop when set, else
    /// the whole buffer, else [`PixelRect::INVALID`] before the first latch.
    /// Base layers use their active window rect.
    #[must_use]
    pub fn content_crop(&self) -> PixelRect {
        match &self.buffer {
            Some(buffer) => buffer.content_crop(),
            None => self.drawing.active.bounds(),
        }
    }

    /// Orientation of the content relative to the window.
    #[must_use]
    pub fn content_transform(&self) -> Orientation {
        match &self.buffer {
            Some(buffer) => buffer.transform(),
            None => Orientation::ROT_0,
        }
    }

    /// The buffer-space source crop for a hardware plane.
    ///
    /// The window crop (or the whole window when no crop is set) is clipped
    /// to the display viewport in layer-stack space and mapped back into
    /// window space. Its distance from each window edge is then carried into
    /// the content crop, scaled by content-to-window size and rounded up to
    /// whole buffer pixels. With no window clipping the content crop is
    /// returned unchanged.
    #[must_use]
    pub fn compute_crop(&self, display: &DisplayProjection) -> PixelRect {
        let mut crop = self.content_crop();
        let s = &self.drawing;
        let win_w = i32::try_from(s.active.width).unwrap_or(i32::MAX);
        let win_h = i32::try_from(s.active.height).unwrap_or(i32::MAX);

        let window_crop = self.compute_bounds();
        let on_screen = s.transform.map_rect(window_crop).intersect(display.viewport);
        let active_crop = match s.transform.inverse() {
            Some(inverse) => inverse.map_rect(on_screen).intersect(s.active.bounds()),
            None => PixelRect::EMPTY,
        };
        if active_crop.is_empty() {
            return crop;
        }

        // Bring the window crop into the buffer's orientation.
        let mut inv_transform = self.content_transform();
        let (mut oriented_w, mut oriented_h) = (win_w, win_h);
        if inv_transform.contains(Orientation::ROT_90) {
            inv_transform ^= Orientation::FLIP_H | Orientation::FLIP_V;
            (oriented_w, oriented_h) = (win_h, win_w);
        }
        let win_crop = active_crop.oriented(inv_transform, win_w, win_h);

        let x_scale = f64::from(crop.width()) / f64::from(oriented_w);
        let y_scale = f64::from(crop.height()) / f64::from(oriented_h);

        crop.left += ceil_to_i32(f64::from(win_crop.left) * x_scale);
        crop.top += ceil_to_i32(f64::from(win_crop.top) * y_scale);
        crop.right -= ceil_to_i32(f64::from(oriented_w - win_crop.right) * x_scale);
        crop.bottom -= ceil_to_i32(f64::from(oriented_h - win_crop.bottom) * y_scale);
        crop
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "insets are bounded by the content crop size"
)]
fn ceil_to_i32(v: f64) -> i32 {
    v.ceil() as i32
}
