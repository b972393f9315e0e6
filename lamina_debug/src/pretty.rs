// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Present
//! times are converted to microseconds using a [`Timebase`].

use std::io::Write;

use lamina_core::time::{HostTime, Timebase};
use lamina_core::trace::{FramePresentedEvent, LatchEvent, TraceSink, TransactionEvent};
use lamina_core::transaction::CommitFlags;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn us(&self, t: Option<HostTime>) -> String {
        match t {
            Some(t) => format!("{:.1}µs", self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1000.0),
            None => "?".into(),
        }
    }
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transaction(&mut self, e: &TransactionEvent) {
        let visible = e.flags.contains(CommitFlags::VISIBLE_REGION);
        let _ = writeln!(
            self.writer,
            "[commit] layer={} seq={} visible-region={} filtering={}",
            e.layer.get(),
            e.sequence,
            yes_no(visible),
            yes_no(e.needs_filtering),
        );
    }

    fn on_latch(&mut self, e: &LatchEvent) {
        let buffer = e
            .buffer
            .map_or_else(|| "none".to_owned(), |b| b.0.to_string());
        let d = e.dirty_bounds;
        let _ = writeln!(
            self.writer,
            "[latch] layer={} buffer={buffer} queued={} dropped={} recompute={} \
             dirty=({},{},{},{})",
            e.layer.get(),
            e.queued_frames,
            e.frames_dropped,
            yes_no(e.recompute_visible_regions),
            d.left,
            d.top,
            d.right,
            d.bottom,
        );
    }

    fn on_frame_presented(&mut self, e: &FramePresentedEvent) {
        let _ = writeln!(
            self.writer,
            "[present] layer={} desired={} actual={}",
            e.layer.get(),
            self.us(e.desired_present),
            self.us(e.actual_present),
        );
    }
}
