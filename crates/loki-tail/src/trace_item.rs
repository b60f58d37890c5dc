// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tail events handed to us by the hosting runtime, one per traced invocation.
//!
//! Only the fields the transformer reads are modelled. Everything else the
//! host sends along (request metadata, diagnostics channels, ...) is ignored
//! during deserialization.

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// How the traced invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Outcome {
    Ok,
    Exception,
    ExceededCpu,
    ExceededMemory,
    ScriptNotFound,
    Canceled,
    ResponseStreamDisconnected,
    Unknown,
    Other(String),
}

impl Outcome {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Exception => "exception",
            Outcome::ExceededCpu => "exceededCpu",
            Outcome::ExceededMemory => "exceededMemory",
            Outcome::ScriptNotFound => "scriptNotFound",
            Outcome::Canceled => "canceled",
            Outcome::ResponseStreamDisconnected => "responseStreamDisconnected",
            Outcome::Unknown => "unknown",
            Outcome::Other(other) => other,
        }
    }

    /// Only invocations that ran to completion or threw are forwarded.
    #[must_use]
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Outcome::Ok | Outcome::Exception)
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ok" => Outcome::Ok,
            "exception" => Outcome::Exception,
            "exceededCpu" => Outcome::ExceededCpu,
            "exceededMemory" => Outcome::ExceededMemory,
            "scriptNotFound" => Outcome::ScriptNotFound,
            "canceled" => Outcome::Canceled,
            "responseStreamDisconnected" => Outcome::ResponseStreamDisconnected,
            "unknown" => Outcome::Unknown,
            _ => Outcome::Other(value),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One traced invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceItem {
    pub outcome: Outcome,
    #[serde(default)]
    pub script_name: Option<String>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub exceptions: Vec<ExceptionEntry>,
}

impl TraceItem {
    /// The originating application, if the host reported a non-empty one.
    #[must_use]
    pub fn app(&self) -> Option<&str> {
        self.script_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// A `console.*` style log line captured during the invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    pub level: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub message: Vec<Value>,
}

impl LogEntry {
    /// Text of the first message argument.
    ///
    /// Strings are used as-is and other values are rendered as compact JSON.
    /// Returns `None` when there is nothing worth shipping: no arguments or a
    /// falsy leading value (`null`, `false`, `0`, `""`).
    #[must_use]
    pub fn first_message(&self) -> Option<Cow<'_, str>> {
        match self.message.first()? {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(Cow::Borrowed(text.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// An uncaught exception thrown during the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExceptionEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub name: String,
    pub message: String,
}
