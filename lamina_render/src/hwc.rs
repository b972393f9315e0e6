// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware-overlay plane settings.

use lamina_core::buffer::{BufferHandle, Fence};
use lamina_core::display::DisplayProjection;
use lamina_core::layer::Layer;
use lamina_core::orientation::Orientation;
use lamina_core::rect::PixelRect;
use lamina_core::region::Region;

/// How a plane blends with the pixels below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Blending {
    /// The plane replaces what is below.
    #[default]
    None,
    /// Source color is already multiplied by alpha.
    Premultiplied,
    /// Source color is multiplied by alpha while blending.
    Coverage,
}

/// The path a layer is composited through for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Composition {
    /// Drawn into the framebuffer by the GPU.
    #[default]
    Gpu,
    /// Scanned out from an overlay plane.
    Overlay,
}

/// One hardware-composer plane slot, as seen by a layer.
///
/// The composer decides [`Composition`] per layer after geometry is set;
/// layers read it back when choosing whether to hand over an acquire fence.
pub trait HwcLayer {
    /// Resets every plane setting.
    fn set_default_state(&mut self);

    /// Sets the plane orientation. `None` means the layer transform cannot
    /// be shown by a plane and the layer must fall back to the GPU.
    fn set_transform(&mut self, transform: Option<Orientation>);

    /// Sets the blend mode.
    fn set_blending(&mut self, blending: Blending);

    /// Sets the display-space destination rect.
    fn set_frame(&mut self, frame: PixelRect);

    /// Sets the buffer-space source rect.
    fn set_crop(&mut self, crop: PixelRect);

    /// Sets the display-space region the plane actually shows.
    fn set_visible_region_screen(&mut self, region: &Region);

    /// Sets the buffer to scan out.
    fn set_buffer(&mut self, buffer: Option<BufferHandle>);

    /// Sets the fence the composer waits on before reading the buffer.
    fn set_acquire_fence(&mut self, fence: Option<Fence>);

    /// How the composer chose to show this layer.
    fn composition_type(&self) -> Composition;

    /// Called once the frame containing this plane has been displayed.
    fn on_displayed(&mut self);

    /// Takes the fence that signals when the composer stops reading the
    /// buffer, leaving `None` behind.
    fn take_release_fence(&mut self) -> Option<Fence>;
}

/// Plane settings that change only with layer geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HwcGeometry {
    /// Orientation part of the layer transform; `None` when it holds a
    /// rotation that is not a multiple of 90°.
    pub transform: Option<Orientation>,
    /// Blend mode.
    pub blending: Blending,
    /// Layer bounds clipped to the viewport, in display space.
    pub frame: PixelRect,
    /// Source rect in buffer pixels.
    pub crop: PixelRect,
}

impl HwcGeometry {
    /// Derives plane settings from the layer's drawing state.
    ///
    /// Blending is on whenever the layer is not opaque or its alpha is below
    /// full; it is premultiplied or coverage depending on the layer's alpha
    /// format.
    #[must_use]
    pub fn for_layer(layer: &Layer, display: &DisplayProjection) -> Self {
        let s = layer.drawing_state();

        let orientation = s.transform.orientation();
        let transform = orientation.is_valid().then_some(orientation);

        let blending = if !layer.is_opaque() || s.alpha != u8::MAX {
            if layer.is_premultiplied() {
                Blending::Premultiplied
            } else {
                Blending::Coverage
            }
        } else {
            Blending::None
        };

        let frame = s
            .transform
            .map_rect(layer.compute_bounds())
            .intersect(display.viewport);

        Self {
            transform,
            blending,
            frame: display.transform.map_rect(frame),
            crop: layer.compute_crop(display),
        }
    }

    /// Returns `true` if a plane can represent the layer transform.
    #[inline]
    #[must_use]
    pub fn fits_overlay(&self) -> bool {
        self.transform.is_some()
    }

    /// Pushes these settings to a plane, starting from its default state.
    pub fn apply(&self, hwc: &mut dyn HwcLayer) {
        hwc.set_default_state();
        hwc.set_transform(self.transform);
        hwc.set_blending(self.blending);
        hwc.set_frame(self.frame);
        hwc.set_crop(self.crop);
    }
}

/// The layer's visible region clipped to the viewport, in display space.
#[must_use]
pub fn visible_region_screen(layer: &Layer, display: &DisplayProjection) -> Region {
    layer
        .visible_region()
        .intersect_rect(display.viewport)
        .transform(&display.transform)
}

#[cfg(test)]
mod tests {
    use lamina_core::display::DisplayProjection;
    use lamina_core::orientation::Orientation;
    use lamina_core::rect::PixelRect;
    use lamina_core::region::Region;
    use lamina_core::transform::{LayerTransform, Matrix22};

    use super::{Blending, HwcGeometry, visible_region_screen};
    use crate::tests::{base_layer, buffer_layer};

    #[test]
    fn opaque_full_alpha_layer_does_not_blend() {
        let layer = base_layer(100, 50);
        let hwc = HwcGeometry::for_layer(&layer, &DisplayProjection::new(200, 200));
        assert_eq!(hwc.blending, Blending::None);
        assert_eq!(hwc.transform, Some(Orientation::ROT_0));
        assert_eq!(hwc.frame, PixelRect::new(0, 0, 100, 50));
        assert_eq!(hwc.crop, PixelRect::new(0, 0, 100, 50));
        assert!(hwc.fits_overlay());
    }

    #[test]
    fn lowering_alpha_enables_blending_after_commit() {
        let mut layer = base_layer(100, 50);
        let display = DisplayProjection::new(200, 200);
        assert!(layer.set_alpha(128));
        assert_eq!(
            HwcGeometry::for_layer(&layer, &display).blending,
            Blending::None,
            "pending alpha is not drawn yet"
        );
        let _ = layer.handle_transaction();
        assert_eq!(
            HwcGeometry::for_layer(&layer, &display).blending,
            Blending::Premultiplied
        );
    }

    #[test]
    fn non_premultiplied_layer_uses_coverage() {
        use lamina_core::layer::{CreateFlags, LayerInit};

        let init = LayerInit::new(10, 10).with_flags(CreateFlags::NON_PREMULTIPLIED);
        let (layer, _source, _notifier) = crate::tests::buffer_layer_with(init);
        let hwc = HwcGeometry::for_layer(&layer, &DisplayProjection::new(10, 10));
        assert_eq!(hwc.blending, Blending::Coverage, "no buffer means not opaque");
    }

    #[test]
    fn frame_is_clipped_to_viewport_then_mapped() {
        let mut layer = base_layer(100, 100);
        assert!(layer.set_position(150.0, 0.0));
        let _ = layer.handle_transaction();
        let display = DisplayProjection::new(200, 200)
            .with_transform(LayerTransform::from_translation(10.0, 20.0));
        let hwc = HwcGeometry::for_layer(&layer, &display);
        assert_eq!(hwc.frame, PixelRect::new(160, 20, 210, 120));
    }

    #[test]
    fn quarter_turn_is_a_plane_orientation() {
        let mut layer = base_layer(100, 50);
        assert!(layer.set_matrix(Matrix22::new(0.0, 1.0, -1.0, 0.0)));
        let _ = layer.handle_transaction();
        let hwc = HwcGeometry::for_layer(&layer, &DisplayProjection::new(400, 400));
        let orientation = hwc.transform.expect("quarter turns fit a plane");
        assert!(orientation.contains(Orientation::ROT_90));
    }

    #[test]
    fn free_rotation_has_no_plane_transform() {
        let mut layer = base_layer(10, 10);
        let (s, c) = (0.6, 0.8);
        assert!(layer.set_matrix(Matrix22::new(c, s, -s, c)));
        let _ = layer.handle_transaction();
        let hwc = HwcGeometry::for_layer(&layer, &DisplayProjection::new(100, 100));
        assert_eq!(hwc.transform, None);
        assert!(!hwc.fits_overlay());
    }

    #[test]
    fn visible_region_is_clipped_and_mapped() {
        let (mut layer, _source, _notifier) = buffer_layer(50, 50);
        layer.set_visible_region(Region::from_rect(PixelRect::new(0, 0, 50, 50)));
        let display = DisplayProjection::new(100, 100)
            .with_viewport(PixelRect::new(0, 0, 30, 100))
            .with_transform(LayerTransform::from_translation(5.0, 0.0));
        assert_eq!(
            visible_region_screen(&layer, &display),
            Region::from_rect(PixelRect::new(5, 0, 35, 50))
        );
    }
}
