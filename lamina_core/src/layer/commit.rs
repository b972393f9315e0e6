// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folding pending state into drawing state.

use crate::transaction::{CommitFlags, TransactionFlags};

use super::Layer;

impl Layer {
    /// Commits if a transaction was requested.
    ///
    /// Clears the transaction-needed bit and, if it was set, runs
    /// [`do_transaction`](Self::do_transaction). Returns `None` when there
    /// was nothing to commit.
    pub fn handle_transaction(&mut self) -> Option<CommitFlags> {
        if self
            .take_transaction_flags(TransactionFlags::TRANSACTION_NEEDED)
            .is_empty()
        {
            return None;
        }
        Some(self.do_transaction(CommitFlags::empty()))
    }

    /// Commits pending state and reports what changed.
    ///
    /// Unless `DONT_UPDATE_GEOMETRY` is set (by the caller or by a pending
    /// resize on a buffer-backed layer), requested geometry becomes active.
    /// The result has `VISIBLE_REGION` when the active geometry or the
    /// sequence differs from the drawing state. A sequence change also marks
    /// the content dirty and recomputes whether the transform needs
    /// filtering. The pending state then becomes the drawing state.
    pub fn do_transaction(&mut self, flags: CommitFlags) -> CommitFlags {
        let mut flags = flags;
        if let Some(buffer) = self.buffer.as_mut() {
            flags |= buffer.prepare_commit(&self.drawing, &self.current);
        }

        if !flags.contains(CommitFlags::DONT_UPDATE_GEOMETRY) {
            self.current.active = self.current.requested;
        }

        if self.drawing.active != self.current.active {
            flags |= CommitFlags::VISIBLE_REGION;
        }

        if self.drawing.sequence != self.current.sequence {
            flags |= CommitFlags::VISIBLE_REGION;
            self.content_dirty = true;
            self.needs_filtering = self.current.transform.needs_filtering();
        }

        self.commit_transaction();
        flags
    }

    fn commit_transaction(&mut self) {
        self.drawing.clone_from(&self.current);
    }
}
