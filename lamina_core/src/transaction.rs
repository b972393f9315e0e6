// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transaction-pending bits.
//!
//! Mutators run on client threads and raise bits in a
//! [`PendingTransaction`]; the compositor thread fetches and clears them when
//! it decides whether a layer needs a commit. Each raise returns the previous
//! bits, so a caller can tell whether it was the one that armed the
//! transaction.

use core::sync::atomic::{AtomicU32, Ordering};

use bitflags::bitflags;

bitflags! {
    /// Bits raised by mutators and consumed by the commit step.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TransactionFlags: u32 {
        /// The pending state differs from the drawing state.
        const TRANSACTION_NEEDED = 0x01;
    }
}

bitflags! {
    /// Flags passed into and returned from a commit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CommitFlags: u32 {
        /// Keep the active geometry; a resize is waiting for a matching buffer.
        const DONT_UPDATE_GEOMETRY = 0x01;
        /// Screen coverage changed, visible regions must be recomputed.
        const VISIBLE_REGION = 0x02;
    }
}

/// Atomic cell of [`TransactionFlags`].
///
/// Bits outside the named flags are preserved, so callers may use spare bits
/// for their own bookkeeping.
#[derive(Debug, Default)]
pub struct PendingTransaction {
    bits: AtomicU32,
}

impl PendingTransaction {
    /// Creates a cell with no bits raised.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
        }
    }

    /// Raises `flags` and returns the bits that were set before.
    pub fn raise(&self, flags: TransactionFlags) -> TransactionFlags {
        TransactionFlags::from_bits_retain(self.bits.fetch_or(flags.bits(), Ordering::AcqRel))
    }

    /// Clears `mask` and returns which of its bits were set.
    ///
    /// Between two concurrent takers of the same bit exactly one observes it.
    pub fn take(&self, mask: TransactionFlags) -> TransactionFlags {
        let old = self.bits.fetch_and(!mask.bits(), Ordering::AcqRel);
        TransactionFlags::from_bits_retain(old & mask.bits())
    }

    /// Reads the raised bits without clearing them.
    #[must_use]
    pub fn peek(&self) -> TransactionFlags {
        TransactionFlags::from_bits_retain(self.bits.load(Ordering::Acquire))
    }
}
