// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client mutators and the transaction-flag API.
//!
//! Every mutator compares against the pending state first. An unchanged
//! value returns `false` and touches nothing. A change writes the pending
//! state, bumps its sequence exactly once and requests a transaction.

use alloc::sync::Arc;

use crate::display::LayerStack;
use crate::rect::PixelRect;
use crate::region::Region;
use crate::transaction::{PendingTransaction, TransactionFlags};
use crate::transform::Matrix22;

use super::{Layer, StateFlags};

impl Layer {
    /// Moves the layer in layer-stack space.
    pub fn set_position(&mut self, x: f64, y: f64) -> bool {
        let t = self.current.transform.translation();
        if t.x == x && t.y == y {
            return false;
        }
        self.current.transform = self.current.transform.with_translation(x, y);
        self.state_changed()
    }

    /// Sets the stacking order.
    pub fn set_layer(&mut self, z: u32) -> bool {
        if self.current.z == z {
            return false;
        }
        self.current.z = z;
        self.state_changed()
    }

    /// Requests a new window size.
    ///
    /// Only the requested geometry changes; whether and when the active
    /// geometry follows is decided at commit and latch time.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        let requested = &mut self.current.requested;
        if requested.width == width && requested.height == height {
            return false;
        }
        requested.width = width;
        requested.height = height;
        self.state_changed()
    }

    /// Sets the plane alpha.
    pub fn set_alpha(&mut self, alpha: u8) -> bool {
        if self.current.alpha == alpha {
            return false;
        }
        self.current.alpha = alpha;
        self.state_changed()
    }

    /// Replaces the linear part of the transform, keeping the position.
    pub fn set_matrix(&mut self, matrix: Matrix22) -> bool {
        if self.current.transform.matrix() == matrix {
            return false;
        }
        self.current.transform = self.current.transform.with_matrix(matrix);
        self.state_changed()
    }

    /// Sets the client's hint of transparent window areas.
    pub fn set_transparent_region_hint(&mut self, region: Region) -> bool {
        if self.current.transparent_region == region {
            return false;
        }
        self.current.transparent_region = region;
        self.state_changed()
    }

    /// Updates the bits of the flags selected by `mask` to those in `flags`.
    ///
    /// Bits outside `mask` are kept.
    pub fn set_flags(&mut self, flags: StateFlags, mask: StateFlags) -> bool {
        let new_flags = self.current.flags.difference(mask) | flags.intersection(mask);
        if self.current.flags == new_flags {
            return false;
        }
        self.current.flags = new_flags;
        self.state_changed()
    }

    /// Requests a window-space crop. An empty rect removes the crop.
    pub fn set_crop(&mut self, crop: PixelRect) -> bool {
        if self.current.requested.crop == crop {
            return false;
        }
        self.current.requested.crop = crop;
        self.state_changed()
    }

    /// Moves the layer to another layer stack.
    pub fn set_layer_stack(&mut self, layer_stack: LayerStack) -> bool {
        if self.current.layer_stack == layer_stack {
            return false;
        }
        self.current.layer_stack = layer_stack;
        self.state_changed()
    }

    /// Bumps the pending sequence without changing any value, so the next
    /// commit reports a visible-region change.
    pub fn force_visibility_transaction(&mut self) {
        self.state_changed();
    }

    /// Raises the transaction-needed bit.
    ///
    /// Returns `true` if this call raised it, `false` if it was already set.
    pub fn request_transaction(&self) -> bool {
        !self
            .set_transaction_flags(TransactionFlags::TRANSACTION_NEEDED)
            .contains(TransactionFlags::TRANSACTION_NEEDED)
    }

    /// Atomically raises `flags` and returns the bits set before.
    pub fn set_transaction_flags(&self, flags: TransactionFlags) -> TransactionFlags {
        self.pending.raise(flags)
    }

    /// Atomically clears `mask` and returns which of its bits were set.
    pub fn take_transaction_flags(&self, mask: TransactionFlags) -> TransactionFlags {
        self.pending.take(mask)
    }

    /// A shared handle to the transaction bits, for threads that arm or
    /// poll transactions without holding the layer.
    #[must_use]
    pub fn transaction_signal(&self) -> Arc<PendingTransaction> {
        Arc::clone(&self.pending)
    }

    fn state_changed(&mut self) -> bool {
        self.current.sequence = self.current.sequence.wrapping_add(1);
        self.request_transaction();
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::display::LayerStack;
    use crate::layer::StateFlags;
    use crate::layer::tests::base_layer;
    use crate::rect::PixelRect;
    use crate::region::Region;
    use crate::transaction::TransactionFlags;
    use crate::transform::Matrix22;

    #[test]
    fn repeated_mutation_advances_sequence_once() {
        let mut layer = base_layer(100, 100);
        let seq = layer.current_state().sequence;

        assert!(layer.set_position(10.0, 20.0));
        assert!(!layer.set_position(10.0, 20.0));
        assert!(layer.set_layer(3));
        assert!(!layer.set_layer(3));
        assert!(layer.set_size(50, 60));
        assert!(!layer.set_size(50, 60));
        assert!(layer.set_alpha(9));
        assert!(!layer.set_alpha(9));
        assert!(layer.set_matrix(Matrix22::new(2.0, 0.0, 0.0, 2.0)));
        assert!(!layer.set_matrix(Matrix22::new(2.0, 0.0, 0.0, 2.0)));
        let hint = Region::from_rect(PixelRect::new(0, 0, 5, 5));
        assert!(layer.set_transparent_region_hint(hint.clone()));
        assert!(!layer.set_transparent_region_hint(hint));
        assert!(layer.set_flags(StateFlags::HIDDEN, StateFlags::HIDDEN));
        assert!(!layer.set_flags(StateFlags::HIDDEN, StateFlags::HIDDEN));
        assert!(layer.set_crop(PixelRect::new(1, 1, 9, 9)));
        assert!(!layer.set_crop(PixelRect::new(1, 1, 9, 9)));
        assert!(layer.set_layer_stack(LayerStack(2)));
        assert!(!layer.set_layer_stack(LayerStack(2)));

        assert_eq!(layer.current_state().sequence, seq + 9);
    }

    #[test]
    fn unchanged_crop_requests_nothing() {
        let mut layer = base_layer(100, 100);
        let crop = layer.current_state().requested.crop;
        assert!(!layer.set_crop(crop));
        assert!(layer
            .take_transaction_flags(TransactionFlags::TRANSACTION_NEEDED)
            .is_empty());
    }

    #[test]
    fn mutation_arms_transaction_once() {
        let mut layer = base_layer(100, 100);
        assert!(layer.set_alpha(1));
        // Already armed by the mutation.
        assert!(!layer.request_transaction());
        assert_eq!(
            layer.take_transaction_flags(TransactionFlags::TRANSACTION_NEEDED),
            TransactionFlags::TRANSACTION_NEEDED
        );
        assert!(layer.request_transaction());
    }

    #[test]
    fn set_flags_respects_mask() {
        let mut layer = base_layer(10, 10);
        assert!(!layer.set_flags(StateFlags::HIDDEN, StateFlags::empty()));
        assert!(layer.set_flags(StateFlags::HIDDEN, StateFlags::all()));
        assert!(layer.set_flags(StateFlags::empty(), StateFlags::HIDDEN));
        assert!(!layer.current_state().is_hidden());
    }

    #[test]
    fn set_matrix_keeps_position() {
        let mut layer = base_layer(10, 10);
        assert!(layer.set_position(3.0, 4.0));
        assert!(layer.set_matrix(Matrix22::new(0.0, 1.0, -1.0, 0.0)));
        let t = layer.current_state().transform.translation();
        assert_eq!((t.x, t.y), (3.0, 4.0));
    }

    #[test]
    fn forced_visibility_bumps_sequence() {
        let mut layer = base_layer(10, 10);
        layer.force_visibility_transaction();
        assert_eq!(layer.current_state().sequence, 1);
        assert!(!layer
            .take_transaction_flags(TransactionFlags::TRANSACTION_NEEDED)
            .is_empty());
    }

    #[test]
    fn signal_handle_shares_bits() {
        let layer = base_layer(10, 10);
        let signal = layer.transaction_signal();
        signal.raise(TransactionFlags::TRANSACTION_NEEDED);
        assert!(!layer.request_transaction());
    }
}
