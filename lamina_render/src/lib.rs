// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition descriptors for [`lamina_core`] layers.
//!
//! A committed layer reaches the screen one of two ways. A hardware composer
//! can scan its buffer out of an overlay plane, which only works for
//! axis-aligned integer rects and the eight flip/rotation orientations. When
//! that is not possible the layer is drawn by the GPU as a textured quad.
//! This crate turns a layer's drawing state into the inputs of both paths:
//!
//! - [`HwcGeometry`] and [`HwcLayer`]: plane settings and the composer
//!   interface that receives them
//! - [`GlDraw`] and [`Renderer`]: a textured-quad description and the
//!   renderer that draws it
//! - [`LayerComposition`]: the per-layer entry points the compositor calls
//!   each frame, implemented for [`Layer`](lamina_core::layer::Layer)
//!
//! Nothing here submits GPU commands or talks to display hardware.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod compose;
mod gl;
mod hwc;


pub use compose::LayerComposition;
pub use gl::{GlDraw, GlTexture, Renderer, SourceFactor, TexEnv};
pub use hwc::{Blending, Composition, HwcGeometry, HwcLayer, visible_region_screen};
