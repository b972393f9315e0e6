// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-layer state engine.
//!
//! A [`Layer`] holds two copies of [`LayerState`]: the pending state that
//! client mutators write and the drawing state that composition reads.
//! Mutators raise a transaction bit; the compositor later calls
//! [`Layer::handle_transaction`] to fold pending into drawing and learn
//! whether screen coverage changed.
//!
//! Beyond the base state, a layer can carry two optional facets:
//!
//! - a **client binding** ([`ClientId`]) that hands its surface handle out
//!   at most once, and
//! - a **buffer queue** ([`BufferState`]) whose newest buffer is latched
//!   once per composition pass.
//!
//! Mutators take `&mut self`; callers serialize them with the commit step
//! (typically by keeping the layer behind a mutex). Producers announce new
//! frames through a [`FrameNotifier`], which never needs that lock.

mod client;
mod commit;
mod geometry;
mod id;
mod latch;
mod mutate;
mod state;

use alloc::boxed::Box;
use alloc::sync::Arc;

pub use client::{ClientId, SurfaceHandle};
pub use geometry::LayerMesh;
pub use id::{LayerId, LayerIdAllocator};
pub use latch::{BufferState, LatchOutcome};
pub use state::{CreateFlags, Geometry, LayerInit, LayerState, StateFlags};

use crate::buffer::BufferSource;
use crate::display::DisplayProjection;
use crate::frame::{FrameNotifier, FrameQueue, UpdateSignal};
use crate::region::Region;
use crate::transaction::PendingTransaction;

use client::ClientBinding;

/// A compositing layer.
#[derive(Debug)]
pub struct Layer {
    id: LayerId,
    create_flags: CreateFlags,
    /// Pending state written by mutators.
    current: LayerState,
    /// State used for composition.
    drawing: LayerState,
    pending: Arc<PendingTransaction>,
    content_dirty: bool,
    needs_filtering: bool,
    filtering: bool,
    premultiplied_alpha: bool,
    visible_region: Region,
    covered_region: Region,
    visible_non_transparent_region: Region,
    client: Option<ClientBinding>,
    buffer: Option<BufferState>,
}

impl Layer {
    /// Creates a base layer.
    ///
    /// Pending and drawing state start out identical, so a fresh layer has
    /// nothing to commit.
    #[must_use]
    pub fn new(id: LayerId, init: &LayerInit) -> Self {
        let mut flags = StateFlags::empty();
        if init.flags.contains(CreateFlags::HIDDEN) {
            flags |= StateFlags::HIDDEN;
        }
        let current = LayerState::new(init.width, init.height, flags);
        Self {
            id,
            create_flags: init.flags,
            drawing: current.clone(),
            current,
            pending: Arc::new(PendingTransaction::new()),
            content_dirty: false,
            needs_filtering: false,
            filtering: false,
            premultiplied_alpha: !init.flags.contains(CreateFlags::NON_PREMULTIPLIED),
            visible_region: Region::new(),
            covered_region: Region::new(),
            visible_non_transparent_region: Region::new(),
            client: None,
            buffer: None,
        }
    }

    /// Binds the layer to a client connection.
    #[must_use]
    pub fn with_client(mut self, client: ClientId) -> Self {
        self.client = Some(ClientBinding::new(client));
        self
    }

    /// Attaches a buffer queue.
    ///
    /// The source is told the layer size as its default buffer size. New
    /// frames are announced through [`Layer::frame_notifier`], which wakes
    /// the compositor with `signal`.
    #[must_use]
    pub fn with_buffer_source(
        mut self,
        mut source: Box<dyn BufferSource + Send>,
        signal: Arc<dyn UpdateSignal>,
    ) -> Self {
        source.set_default_buffer_size(self.current.requested.width, self.current.requested.height);
        self.buffer = Some(BufferState::new(Arc::new(FrameQueue::new(signal)), source));
        self
    }

    /// Returns the layer identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Returns the flags the layer was created with.
    #[inline]
    #[must_use]
    pub fn create_flags(&self) -> CreateFlags {
        self.create_flags
    }

    /// Pending state, as last written by mutators.
    #[inline]
    #[must_use]
    pub fn current_state(&self) -> &LayerState {
        &self.current
    }

    /// Committed state, as used for composition.
    #[inline]
    #[must_use]
    pub fn drawing_state(&self) -> &LayerState {
        &self.drawing
    }

    /// The buffer queue facet, if attached.
    #[inline]
    #[must_use]
    pub fn buffer_state(&self) -> Option<&BufferState> {
        self.buffer.as_ref()
    }

    /// A handle producers use to announce queued frames.
    ///
    /// `None` for layers without a buffer queue.
    #[must_use]
    pub fn frame_notifier(&self) -> Option<FrameNotifier> {
        self.buffer.as_ref().map(|b| FrameNotifier {
            queue: Arc::clone(b.queue()),
        })
    }

    /// Returns `true` if the layer should be composited at all.
    ///
    /// Uses the drawing state: the layer is not hidden and its alpha is not
    /// zero. A layer with a buffer queue also needs a latched buffer.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        let base = !self.drawing.is_hidden() && self.drawing.alpha != 0;
        match &self.buffer {
            Some(buffer) => base && buffer.active_buffer().is_some(),
            None => base,
        }
    }

    /// Returns `true` if the layer's content covers every pixel it draws.
    ///
    /// Base layers are opaque. A buffer-backed layer is opaque once it shows
    /// a buffer and either was created opaque or the buffer format has no
    /// alpha.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        match &self.buffer {
            Some(buffer) => buffer.shows_opaque(self.create_flags),
            None => true,
        }
    }

    /// Returns `true` if the layer's content must not be captured.
    #[inline]
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.create_flags.contains(CreateFlags::SECURE)
    }

    /// Returns `true` if content alpha is premultiplied.
    #[inline]
    #[must_use]
    pub fn is_premultiplied(&self) -> bool {
        self.premultiplied_alpha
    }

    /// Returns `true` if the last committed change touched the layer's
    /// content or transform.
    #[inline]
    #[must_use]
    pub fn is_content_dirty(&self) -> bool {
        self.content_dirty
    }

    /// Reads and clears the content-dirty flag.
    pub fn take_content_dirty(&mut self) -> bool {
        core::mem::take(&mut self.content_dirty)
    }

    /// Whether the committed layer transform resamples content.
    #[inline]
    #[must_use]
    pub fn transform_needs_filtering(&self) -> bool {
        self.needs_filtering
    }

    /// Whether composing on `display` resamples content, either through the
    /// display transform or the layer transform.
    #[must_use]
    pub fn needs_filtering(&self, display: &DisplayProjection) -> bool {
        display.needs_filtering() || self.needs_filtering
    }

    /// Forces filtered sampling regardless of transforms.
    pub fn set_filtering(&mut self, filtering: bool) {
        self.filtering = filtering;
    }

    /// Whether filtered sampling is forced.
    #[inline]
    #[must_use]
    pub fn filtering(&self) -> bool {
        self.filtering
    }

    /// Screen area in layer-stack space where the layer is visible.
    #[inline]
    #[must_use]
    pub fn visible_region(&self) -> &Region {
        &self.visible_region
    }

    /// Stores the visible region computed by the compositor.
    pub fn set_visible_region(&mut self, region: Region) {
        self.visible_region = region;
    }

    /// Area of this layer covered by layers above it.
    #[inline]
    #[must_use]
    pub fn covered_region(&self) -> &Region {
        &self.covered_region
    }

    /// Stores the covered region computed by the compositor.
    pub fn set_covered_region(&mut self, region: Region) {
        self.covered_region = region;
    }

    /// Visible area minus the client's transparent hint.
    #[inline]
    #[must_use]
    pub fn visible_non_transparent_region(&self) -> &Region {
        &self.visible_non_transparent_region
    }

    /// Derives the visible non-transparent region from `visible` and the
    /// drawing state's transparent hint, mapped into layer-stack space.
    pub fn set_visible_non_transparent_region(&mut self, visible: &Region) {
        let mut region = visible.clone();
        region.subtract(
            &self
                .drawing
                .transparent_region
                .transform(&self.drawing.transform),
        );
        self.visible_non_transparent_region = region;
    }
}
