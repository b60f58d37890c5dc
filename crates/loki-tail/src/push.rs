// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Loki push API payload.
//!
//! Serializes to
//! `{"streams":[{"stream":{"level":..,"outcome":..,"app":..},"values":[["<ns>","<line>"]]}]}`.

use serde::Serialize;

/// Label set identifying a stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Labels {
    pub level: String,
    pub outcome: String,
    pub app: String,
}

impl Labels {
    pub fn new(
        level: impl Into<String>,
        outcome: impl Into<String>,
        app: impl Into<String>,
    ) -> Self {
        Labels {
            level: level.into(),
            outcome: outcome.into(),
            app: app.into(),
        }
    }
}

/// A single `(timestamp in nanoseconds, line)` pair.
pub type Entry = (String, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogStream {
    pub stream: Labels,
    pub values: Vec<Entry>,
}

impl LogStream {
    #[must_use]
    pub fn new(stream: Labels) -> Self {
        LogStream {
            stream,
            values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushRequest {
    pub streams: Vec<LogStream>,
}

impl PushRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Total number of lines across all streams.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.streams.iter().map(|s| s.values.len()).sum()
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
