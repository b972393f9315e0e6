// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GPU fallback: a layer as one textured quad.

use kurbo::Point;

use lamina_core::buffer::BufferHandle;
use lamina_core::display::DisplayProjection;
use lamina_core::layer::{Layer, LayerMesh};
use lamina_core::orientation::Orientation;
use lamina_core::rect::PixelRect;
use lamina_core::region::Region;

/// Source factor of the blend equation; the destination factor is always
/// one minus source alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFactor {
    /// Color is already multiplied by alpha.
    One,
    /// Color is multiplied by alpha while blending.
    SrcAlpha,
}

/// How the texture sample combines with the draw color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TexEnv {
    /// Use the sample as is.
    Replace,
    /// Multiply the sample by the draw color.
    Modulate,
}

/// The buffer a quad samples from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlTexture {
    /// Buffer to bind.
    pub buffer: BufferHandle,
    /// Area of the buffer mapped onto the window, in buffer pixels.
    pub crop: PixelRect,
    /// Orientation of the buffer relative to the window.
    pub transform: Orientation,
    /// Sample with bilinear filtering instead of nearest.
    pub filtering: bool,
}

/// Everything a [`Renderer`] needs to draw one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlDraw {
    /// Display-space quad, bottom-left origin.
    pub mesh: LayerMesh,
    /// Normalized texture coordinates matching `mesh` vertex for vertex,
    /// top-left origin.
    pub tex_coords: [Point; 4],
    /// RGBA draw color.
    pub color: [f32; 4],
    /// Blending, or `None` to overwrite the framebuffer.
    pub blend: Option<SourceFactor>,
    /// Texture combine mode.
    pub tex_env: TexEnv,
    /// Texture to sample; `None` for layers without a buffer queue.
    pub texture: Option<GlTexture>,
}

impl GlDraw {
    /// Describes how to draw the layer through `display`.
    ///
    /// With alpha below full the texture is modulated by the layer alpha and
    /// blending is always on. Otherwise the texture replaces the color and
    /// blending follows opacity.
    #[must_use]
    pub fn for_layer(layer: &Layer, display: &DisplayProjection) -> Self {
        let s = layer.drawing_state();
        let factor = if layer.is_premultiplied() {
            SourceFactor::One
        } else {
            SourceFactor::SrcAlpha
        };

        let (color, blend, tex_env) = if s.alpha < u8::MAX {
            let a = f32::from(s.alpha) / 255.0;
            let color = if layer.is_premultiplied() {
                [a, a, a, a]
            } else {
                [1.0, 1.0, 1.0, a]
            };
            (color, Some(factor), TexEnv::Modulate)
        } else {
            let blend = (!layer.is_opaque()).then_some(factor);
            ([1.0; 4], blend, TexEnv::Replace)
        };

        let texture = layer.buffer_state().and_then(|buffer| {
            Some(GlTexture {
                buffer: buffer.active_buffer()?,
                crop: layer.content_crop(),
                transform: layer.content_transform(),
                filtering: layer.filtering()
                    || layer.needs_filtering(display)
                    || buffer.is_fixed_size(),
            })
        });

        Self {
            mesh: layer.compute_geometry(display),
            tex_coords: tex_coords(layer),
            color,
            blend,
            tex_env,
            texture,
        }
    }
}

/// Bounds corners divided by the active size, with `v` flipped so the
/// texture origin sits at the top.
fn tex_coords(layer: &Layer) -> [Point; 4] {
    let win = layer.compute_bounds();
    let active = &layer.drawing_state().active;
    let (w, h) = (f64::from(active.width), f64::from(active.height));
    let u = |x: i32| if w > 0.0 { f64::from(x) / w } else { 0.0 };
    let v = |y: i32| if h > 0.0 { 1.0 - f64::from(y) / h } else { 1.0 };
    [
        Point::new(u(win.left), v(win.top)),
        Point::new(u(win.left), v(win.bottom)),
        Point::new(u(win.right), v(win.bottom)),
        Point::new(u(win.right), v(win.top)),
    ]
}

/// The GPU side of composition.
pub trait Renderer {
    /// Draws a layer quad, limited to `clip` (display space).
    fn draw(&mut self, draw: &GlDraw, clip: &Region);

    /// Fills `mesh` with a flat color, blending off, limited to `clip`.
    fn clear(&mut self, mesh: &LayerMesh, color: [f32; 4], clip: &Region);
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use lamina_core::buffer::{AcquiredBuffer, ScalingMode};
    use lamina_core::display::DisplayProjection;
    use lamina_core::layer::{CreateFlags, LayerInit};
    use lamina_core::rect::PixelRect;

    use super::{GlDraw, SourceFactor, TexEnv};
    use crate::tests::{base_layer, buffer_layer, buffer_layer_with, handle};

    #[test]
    fn opaque_layer_replaces_without_blending() {
        let layer = base_layer(10, 10);
        let draw = GlDraw::for_layer(&layer, &DisplayProjection::new(10, 10));
        assert_eq!(draw.color, [1.0; 4]);
        assert_eq!(draw.blend, None);
        assert_eq!(draw.tex_env, TexEnv::Replace);
        assert_eq!(draw.texture, None);
    }

    #[test]
    fn translucent_premultiplied_layer_modulates() {
        let mut layer = base_layer(10, 10);
        assert!(layer.set_alpha(51));
        let _ = layer.handle_transaction();
        let draw = GlDraw::for_layer(&layer, &DisplayProjection::new(10, 10));
        assert_eq!(draw.color, [0.2; 4]);
        assert_eq!(draw.blend, Some(SourceFactor::One));
        assert_eq!(draw.tex_env, TexEnv::Modulate);
    }

    #[test]
    fn translucent_straight_alpha_keeps_color() {
        let init = LayerInit::new(10, 10).with_flags(CreateFlags::NON_PREMULTIPLIED);
        let (mut layer, _source, _notifier) = buffer_layer_with(init);
        assert!(layer.set_alpha(51));
        let _ = layer.handle_transaction();
        let draw = GlDraw::for_layer(&layer, &DisplayProjection::new(10, 10));
        assert_eq!(draw.color, [1.0, 1.0, 1.0, 0.2]);
        assert_eq!(draw.blend, Some(SourceFactor::SrcAlpha));
    }

    #[test]
    fn translucent_buffer_blends_at_full_alpha() {
        let (mut layer, source, notifier) = buffer_layer(10, 10);
        source.push(AcquiredBuffer::new(handle(1, 10, 10)));
        notifier.on_frame_available();
        let _ = layer.latch_buffer();
        let draw = GlDraw::for_layer(&layer, &DisplayProjection::new(10, 10));
        assert_eq!(draw.blend, Some(SourceFactor::One), "buffer has alpha");
        assert_eq!(draw.tex_env, TexEnv::Replace);
        let texture = draw.texture.expect("latched buffer");
        assert_eq!(texture.buffer.id, handle(1, 10, 10).id);
        assert!(!texture.filtering);
    }

    #[test]
    fn full_window_tex_coords_flip_v() {
        let layer = base_layer(40, 20);
        let draw = GlDraw::for_layer(&layer, &DisplayProjection::new(40, 20));
        assert_eq!(
            draw.tex_coords,
            [
                Point::new(0.0, 1.0),
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn cropped_tex_coords_are_fractions_of_the_window() {
        let mut layer = base_layer(40, 20);
        assert!(layer.set_crop(PixelRect::new(10, 5, 30, 20)));
        let _ = layer.handle_transaction();
        let draw = GlDraw::for_layer(&layer, &DisplayProjection::new(40, 20));
        assert_eq!(draw.tex_coords[0], Point::new(0.25, 0.75));
        assert_eq!(draw.tex_coords[2], Point::new(0.75, 0.0));
    }

    #[test]
    fn scaled_buffer_is_filtered() {
        let (mut layer, source, notifier) = buffer_layer(10, 10);
        let mut item = AcquiredBuffer::new(handle(1, 20, 20));
        item.scaling_mode = ScalingMode::ScaleToWindow;
        source.push(item);
        notifier.on_frame_available();
        let _ = layer.latch_buffer();
        let draw = GlDraw::for_layer(&layer, &DisplayProjection::new(10, 10));
        assert!(draw.texture.expect("latched buffer").filtering);
    }

    #[test]
    fn gpu_and_plane_crops_agree_within_a_pixel() {
        // Large downscale: the plane crop rounds each inset up to a whole
        // buffer pixel while the quad samples the exact fraction.
        let (mut layer, source, notifier) = buffer_layer(7, 7);
        let mut item = AcquiredBuffer::new(handle(1, 1000, 1000));
        item.scaling_mode = ScalingMode::ScaleToWindow;
        source.push(item);
        notifier.on_frame_available();
        let _ = layer.latch_buffer();
        assert!(layer.set_crop(PixelRect::new(3, 2, 6, 7)));
        let _ = layer.handle_transaction();

        let display = DisplayProjection::new(100, 100);
        let draw = GlDraw::for_layer(&layer, &display);
        let plane = crate::HwcGeometry::for_layer(&layer, &display).crop;

        let exact_left = draw.tex_coords[0].x * 1000.0;
        let exact_top = (1.0 - draw.tex_coords[0].y) * 1000.0;
        let exact_right = draw.tex_coords[2].x * 1000.0;
        for (got, exact) in [
            (plane.left, exact_left),
            (plane.top, exact_top),
            (plane.right, exact_right),
        ] {
            assert!(
                (f64::from(got) - exact).abs() < 1.0,
                "plane edge {got} vs exact {exact}"
            );
        }
        assert_ne!(f64::from(plane.left), exact_left, "rounding is visible");
    }
}
