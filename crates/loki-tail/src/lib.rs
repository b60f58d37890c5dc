// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Forwards serverless tail events to Loki.
//!
//! A host hands over one batch of [`trace_item::TraceItem`]s per invocation.
//! [`transformer`] turns it into label-tagged streams, [`flusher`] pushes them
//! with bounded retry, and [`tail`] ties the two together.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod flusher;
pub mod http;
pub mod logger;
pub mod push;
pub mod retry;
pub mod tail;
pub mod trace_item;
pub mod transformer;
