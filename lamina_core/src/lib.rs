// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer state engine for a display compositor.
//!
//! `lamina_core` models one compositing layer: its double-buffered client
//! state, the transaction that commits it, the buffer latched from its
//! producer queue, and the geometry needed to put it on screen. It is
//! `no_std` compatible (with `alloc`) and knows nothing about any particular
//! GPU or hardware-composer API; those sit behind traits and in
//! `lamina_render`.
//!
//! # Architecture
//!
//! ```text
//!   client thread                 producer thread
//!   Layer::set_* ──► pending      FrameNotifier::on_frame_available
//!        │ raise                        │ count + UpdateSignal
//!        ▼                              ▼
//!   PendingTransaction           queued frame counter
//!        │                              │
//!        └──────────► compositor ◄──────┘
//!                        │
//!   Layer::handle_transaction ──► CommitFlags
//!   Layer::latch_buffer       ──► LatchOutcome (dirty region)
//!   Layer::compute_geometry / compute_crop ──► lamina_render
//!   Layer::on_pre_composition / on_post_composition ──► FrameTracker
//! ```
//!
//! **[`layer`]**: [`Layer`](layer::Layer), its state snapshots, mutators,
//! commit, geometry and buffer latch.
//!
//! **[`transaction`]**: Atomic transaction-pending bits and commit flags.
//!
//! **[`frame`]**: Lock-free frame-available notification.
//!
//! **[`buffer`]**: Buffer handles and the [`BufferSource`](buffer::BufferSource)
//! trait for the consumer end of a producer queue.
//!
//! **[`transform`]**, **[`orientation`]**, **[`rect`]**, **[`region`]**:
//! Geometry primitives. Transforms are [`kurbo::Affine`] underneath.
//!
//! **[`display`]**: The display projection layers are drawn through.
//!
//! **[`stats`]**: Per-layer frame timing history.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) hooks with a
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod buffer;
pub mod display;
pub mod frame;
pub mod layer;
pub mod orientation;
pub mod rect;
pub mod region;
pub mod stats;
pub mod time;
pub mod trace;
pub mod transaction;
pub mod transform;
