// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// A process-unique layer identifier.
///
/// Identifiers come from a [`LayerIdAllocator`] and are never reused by it.
/// Zero is never handed out.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub(crate) u32);

impl LayerId {
    /// Returns the raw identifier value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// Thread-safe source of [`LayerId`]s, starting at 1.
///
/// Usually a single `static` per compositor:
///
/// ```
/// use lamina_core::layer::LayerIdAllocator;
///
/// static LAYER_IDS: LayerIdAllocator = LayerIdAllocator::new();
/// let a = LAYER_IDS.allocate();
/// let b = LAYER_IDS.allocate();
/// assert!(b > a);
/// ```
#[derive(Debug)]
pub struct LayerIdAllocator {
    next: AtomicU32,
}

impl Default for LayerIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerIdAllocator {
    /// Creates an allocator whose first identifier is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Returns a fresh identifier.
    ///
    /// # Panics
    ///
    /// Panics if the 32-bit identifier space is exhausted.
    #[must_use]
    pub fn allocate(&self) -> LayerId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        assert!(id != 0, "layer identifier space exhausted");
        LayerId(id)
    }
}
