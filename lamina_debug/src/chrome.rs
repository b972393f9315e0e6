// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] turns events kept by a [`RecorderSink`](super::recorder::RecorderSink)
//! into [Chrome Trace Event Format][format] JSON. Each layer gets its own
//! track (`tid` is the layer id).
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use lamina_core::time::{HostTime, Timebase};

use crate::recorder::{Recorded, RecordedEvent};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is one JSON array, loadable in `chrome://tracing` or
/// [Perfetto](https://ui.perfetto.dev/). Arrival times are recorder
/// nanoseconds. Presented frames with both a desired and an actual present
/// time become duration events spanning the latency, measured in
/// `present_timebase` ticks.
pub fn export(
    events: &[Recorded],
    present_timebase: Timebase,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());

    for recorded in events {
        let ts = ticks_to_us(recorded.at, Timebase::NANOS);
        match recorded.event {
            RecordedEvent::Transaction(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Transaction",
                    "cat": "Layer",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.layer.get(),
                    "s": "t",
                    "args": {
                        "sequence": e.sequence,
                        "flags": e.flags.bits(),
                        "needs_filtering": e.needs_filtering,
                    }
                }));
            }
            RecordedEvent::Latch(e) => {
                let d = e.dirty_bounds;
                out.push(json!({
                    "ph": "i",
                    "name": "Latch",
                    "cat": "Buffer",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.layer.get(),
                    "s": "t",
                    "args": {
                        "buffer": e.buffer.map(|b| b.0),
                        "queued_frames": e.queued_frames,
                        "frames_dropped": e.frames_dropped,
                        "recompute_visible_regions": e.recompute_visible_regions,
                        "dirty": [d.left, d.top, d.right, d.bottom],
                    }
                }));
            }
            RecordedEvent::FramePresented(e) => match (e.desired_present, e.actual_present) {
                (Some(desired), Some(actual)) => {
                    let start = ticks_to_us(desired, present_timebase);
                    let end = ticks_to_us(actual, present_timebase);
                    out.push(json!({
                        "ph": "X",
                        "name": "FrameLatency",
                        "cat": "Present",
                        "ts": start,
                        "dur": (end - start).max(0.0),
                        "pid": 1,
                        "tid": e.layer.get(),
                    }));
                }
                (desired, actual) => {
                    out.push(json!({
                        "ph": "i",
                        "name": "FramePresented",
                        "cat": "Present",
                        "ts": ts,
                        "pid": 0,
                        "tid": e.layer.get(),
                        "s": "t",
                        "args": {
                            "desired_present": desired.map(HostTime::ticks),
                            "actual_present": actual.map(HostTime::ticks),
                        }
                    }));
                }
            },
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

fn ticks_to_us(t: HostTime, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(t.ticks()) as f64 / 1000.0
}
