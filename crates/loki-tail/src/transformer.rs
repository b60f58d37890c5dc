// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Conversion of tail events into Loki streams.
//!
//! The conversion is pure: the same batch always yields the same streams in
//! the same order.
//!
//! For every forwarded event:
//!
//! ```text
//!   logs ──> group by level (first-seen order) ──> one stream per level, debug dropped
//!   exceptions ──────────────────────────────────> one extra "error" stream
//! ```
//!
//! The exception stream is never merged with an `error` stream built from
//! logs, so an event may contribute two streams sharing the same label set.

use std::collections::HashMap;

use crate::push::{Labels, LogStream, PushRequest};
use crate::trace_item::TraceItem;

/// Log level that is never shipped.
pub const DEBUG_LEVEL: &str = "debug";

/// Level label of the stream built from an event's exceptions.
pub const EXCEPTION_LEVEL: &str = "error";

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Converts a millisecond timestamp into Loki's nanosecond string.
///
/// Widened to `i128` so every `i64` input is exact.
#[must_use]
pub fn to_log_nanoseconds(timestamp_ms: i64) -> String {
    (i128::from(timestamp_ms) * NANOS_PER_MILLI).to_string()
}

/// Streams for a whole batch, events concatenated in input order.
#[must_use]
pub fn transform_batch(events: &[TraceItem]) -> PushRequest {
    PushRequest {
        streams: events.iter().flat_map(transform_event).collect(),
    }
}

/// Streams contributed by one event. Empty unless the event ended `ok` or
/// `exception` and names its application.
#[must_use]
pub fn transform_event(event: &TraceItem) -> Vec<LogStream> {
    if !event.outcome.is_forwarded() {
        return Vec::new();
    }
    let Some(app) = event.app() else {
        return Vec::new();
    };
    let outcome = event.outcome.as_str();

    let mut streams: Vec<LogStream> = Vec::new();
    let mut by_level: HashMap<&str, usize> = HashMap::new();

    for log in &event.logs {
        if log.level == DEBUG_LEVEL {
            continue;
        }

        // A level gets its stream as soon as it is seen, even if none of its
        // entries end up carrying a line.
        let index = *by_level.entry(log.level.as_str()).or_insert_with(|| {
            streams.push(LogStream::new(Labels::new(&log.level, outcome, app)));
            streams.len() - 1
        });

        if let Some(line) = log.first_message() {
            streams[index]
                .values
                .push((to_log_nanoseconds(log.timestamp), line.into_owned()));
        }
    }

    if !event.exceptions.is_empty() {
        let mut stream = LogStream::new(Labels::new(EXCEPTION_LEVEL, outcome, app));
        stream.values = event
            .exceptions
            .iter()
            .map(|e| {
                (
                    to_log_nanoseconds(e.timestamp),
                    format!("{}: {}", e.name, e.message),
                )
            })
            .collect();
        streams.push(stream);
    }

    streams
}
