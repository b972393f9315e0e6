// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame composition entry points.

use lamina_core::display::DisplayProjection;
use lamina_core::layer::{LatchOutcome, Layer};
use lamina_core::region::Region;

use crate::gl::{GlDraw, Renderer};
use crate::hwc::{Composition, HwcGeometry, HwcLayer, visible_region_screen};

/// Color used to fill holes under a layer that has no buffer yet.
const HOLE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// What the compositor calls on every layer, in frame order.
///
/// 1. [`latch`](Self::latch) once the layer's transaction is committed.
/// 2. [`preferred_composition`](Self::preferred_composition) and
///    [`set_geometry`](Self::set_geometry) when geometry changed.
/// 3. [`set_per_frame_data`](Self::set_per_frame_data) and
///    [`set_acquire_fence`](Self::set_acquire_fence) every frame.
/// 4. [`draw`](Self::draw) for layers the composer left to the GPU.
/// 5. [`on_layer_displayed`](Self::on_layer_displayed) after the frame is
///    shown.
pub trait LayerComposition {
    /// Adopts the newest queued buffer; see [`Layer::latch_buffer`].
    fn latch(&mut self) -> LatchOutcome;

    /// Which path the layer would like. Overlay needs a latched buffer and a
    /// transform a plane can express; the composer has the final say.
    fn preferred_composition(&self, display: &DisplayProjection) -> Composition;

    /// Pushes geometry-dependent plane settings.
    fn set_geometry(&self, display: &DisplayProjection, hwc: &mut dyn HwcLayer);

    /// Pushes the settings that must be refreshed every frame.
    fn set_per_frame_data(&self, display: &DisplayProjection, hwc: &mut dyn HwcLayer);

    /// Hands the buffer's acquire fence to the plane when it scans the
    /// buffer out directly.
    fn set_acquire_fence(&self, hwc: &mut dyn HwcLayer);

    /// Releases per-frame plane resources and passes the release fence back
    /// to the producer. `None` when the layer had no plane this frame.
    fn on_layer_displayed(&mut self, hwc: Option<&mut dyn HwcLayer>);

    /// Draws the layer with the GPU, limited to `clip`.
    ///
    /// `under` is the display-space area already covered by layers below.
    /// A layer that is waiting for its first buffer fills the part of `clip`
    /// outside `under` with black instead of drawing.
    fn draw(
        &self,
        display: &DisplayProjection,
        clip: &Region,
        under: &Region,
        renderer: &mut dyn Renderer,
    );
}

impl LayerComposition for Layer {
    fn latch(&mut self) -> LatchOutcome {
        self.latch_buffer()
    }

    fn preferred_composition(&self, display: &DisplayProjection) -> Composition {
        let has_buffer = self
            .buffer_state()
            .is_some_and(|buffer| buffer.active_buffer().is_some());
        if has_buffer && HwcGeometry::for_layer(self, display).fits_overlay() {
            Composition::Overlay
        } else {
            Composition::Gpu
        }
    }

    fn set_geometry(&self, display: &DisplayProjection, hwc: &mut dyn HwcLayer) {
        HwcGeometry::for_layer(self, display).apply(hwc);
    }

    fn set_per_frame_data(&self, display: &DisplayProjection, hwc: &mut dyn HwcLayer) {
        hwc.set_visible_region_screen(&visible_region_screen(self, display));
        if let Some(buffer) = self.buffer_state() {
            hwc.set_buffer(buffer.active_buffer());
        }
    }

    fn set_acquire_fence(&self, hwc: &mut dyn HwcLayer) {
        let fence = match hwc.composition_type() {
            Composition::Overlay => self.buffer_state().and_then(|buffer| buffer.fence()),
            Composition::Gpu => None,
        };
        hwc.set_acquire_fence(fence);
    }

    fn on_layer_displayed(&mut self, hwc: Option<&mut dyn HwcLayer>) {
        let Some(hwc) = hwc else {
            return;
        };
        hwc.on_displayed();
        if let Some(fence) = hwc.take_release_fence() {
            self.set_release_fence(fence);
        }
    }

    fn draw(
        &self,
        display: &DisplayProjection,
        clip: &Region,
        under: &Region,
        renderer: &mut dyn Renderer,
    ) {
        let waiting = self
            .buffer_state()
            .is_some_and(|buffer| buffer.active_buffer().is_none());
        if waiting {
            let mut holes = clip.clone();
            holes.subtract(under);
            if !holes.is_empty() {
                renderer.clear(&self.compute_geometry(display), HOLE_COLOR, &holes);
            }
            return;
        }
        renderer.draw(&GlDraw::for_layer(self, display), clip);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use lamina_core::buffer::{AcquiredBuffer, Fence};
    use lamina_core::display::DisplayProjection;
    use lamina_core::layer::Layer;
    use lamina_core::rect::PixelRect;
    use lamina_core::region::Region;
    use lamina_core::transform::Matrix22;

    use super::LayerComposition;
    use crate::hwc::{Blending, Composition};
    use crate::tests::{
        FakeSource, RecordingHwc, RecordingRenderer, base_layer, buffer_layer, handle,
    };

    fn latched(fence: Option<Fence>) -> (Layer, FakeSource) {
        let (mut layer, source, notifier) = buffer_layer(20, 20);
        let mut item = AcquiredBuffer::new(handle(7, 20, 20));
        item.fence = fence;
        source.push(item);
        notifier.on_frame_available();
        let _ = layer.latch();
        (layer, source)
    }

    #[test]
    fn geometry_reaches_the_plane() {
        let mut layer = base_layer(30, 30);
        assert!(layer.set_alpha(200));
        let _ = layer.handle_transaction();
        let mut hwc = RecordingHwc::default();
        layer.set_geometry(&DisplayProjection::new(100, 100), &mut hwc);
        assert_eq!(hwc.resets, 1);
        assert_eq!(hwc.blending, Blending::Premultiplied);
        assert_eq!(hwc.frame, PixelRect::new(0, 0, 30, 30));
        assert_eq!(hwc.crop, PixelRect::new(0, 0, 30, 30));
    }

    #[test]
    fn per_frame_data_sends_region_and_buffer() {
        let (mut layer, _source) = latched(None);
        layer.set_visible_region(Region::from_rect(PixelRect::new(0, 0, 20, 20)));
        let mut hwc = RecordingHwc::default();
        layer.set_per_frame_data(&DisplayProjection::new(10, 10), &mut hwc);
        assert_eq!(
            hwc.visible,
            Region::from_rect(PixelRect::new(0, 0, 10, 10)),
            "clipped to the viewport"
        );
        assert_eq!(hwc.buffer.map(|b| b.id), Some(handle(7, 20, 20).id));
    }

    #[test]
    fn acquire_fence_only_for_overlay() {
        let (layer, _source) = latched(Some(Fence(11)));
        let mut hwc = RecordingHwc::default();
        layer.set_acquire_fence(&mut hwc);
        assert_eq!(hwc.acquire_fence, Some(None), "GPU composition waits itself");

        hwc.composition = Composition::Overlay;
        layer.set_acquire_fence(&mut hwc);
        assert_eq!(hwc.acquire_fence, Some(Some(Fence(11))));
    }

    #[test]
    fn base_layer_never_has_an_acquire_fence() {
        let layer = base_layer(5, 5);
        let mut hwc = RecordingHwc {
            composition: Composition::Overlay,
            ..RecordingHwc::default()
        };
        layer.set_acquire_fence(&mut hwc);
        assert_eq!(hwc.acquire_fence, Some(None));
    }

    #[test]
    fn displayed_layer_returns_release_fence() {
        let (mut layer, source) = latched(None);
        let mut hwc = RecordingHwc {
            release_fence: Some(Fence(3)),
            ..RecordingHwc::default()
        };
        layer.on_layer_displayed(Some(&mut hwc));
        assert_eq!(hwc.displayed, 1);
        assert_eq!(hwc.release_fence, None, "fence is taken");
        assert_eq!(source.release_fences(), [Fence(3)]);

        layer.on_layer_displayed(None);
        assert_eq!(source.release_fences().len(), 1);
    }

    #[test]
    fn overlay_needs_buffer_and_simple_transform() {
        let display = DisplayProjection::new(100, 100);
        assert_eq!(base_layer(5, 5).preferred_composition(&display), Composition::Gpu);

        let (mut layer, _source) = latched(None);
        assert_eq!(layer.preferred_composition(&display), Composition::Overlay);

        let (s, c) = (0.6, 0.8);
        assert!(layer.set_matrix(Matrix22::new(c, s, -s, c)));
        let _ = layer.handle_transaction();
        assert_eq!(layer.preferred_composition(&display), Composition::Gpu);
    }

    #[test]
    fn layer_without_buffer_plugs_holes_in_black() {
        let (layer, _source, _notifier) = buffer_layer(10, 10);
        let display = DisplayProjection::new(10, 10);
        let clip = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        let under = Region::from_rect(PixelRect::new(0, 0, 10, 5));
        let mut renderer = RecordingRenderer::default();
        layer.draw(&display, &clip, &under, &mut renderer);

        assert!(renderer.draws.is_empty());
        let [(color, holes)] = renderer.clears.as_slice() else {
            panic!("expected one clear, got {:?}", renderer.clears);
        };
        assert_eq!(*color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(holes, &Region::from_rect(PixelRect::new(0, 5, 10, 10)));
    }

    #[test]
    fn fully_covered_layer_without_buffer_draws_nothing() {
        let (layer, _source, _notifier) = buffer_layer(10, 10);
        let clip = Region::from_rect(PixelRect::new(0, 0, 10, 10));
        let mut renderer = RecordingRenderer::default();
        layer.draw(&DisplayProjection::new(10, 10), &clip, &clip, &mut renderer);
        assert!(renderer.clears.is_empty());
        assert!(renderer.draws.is_empty());
    }

    #[test]
    fn latched_layer_draws_a_quad() {
        let (layer, _source) = latched(None);
        let clip = Region::from_rect(PixelRect::new(0, 0, 20, 20));
        let mut renderer = RecordingRenderer::default();
        layer.draw(&DisplayProjection::new(20, 20), &clip, &Region::new(), &mut renderer);
        let draws: Vec<_> = renderer.draws.iter().map(|(d, c)| (d.texture.is_some(), c)).collect();
        assert_eq!(draws, [(true, &clip)]);
    }
}
