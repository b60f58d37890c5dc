// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-invocation entry point: transform the batch, then push it.
//!
//! Nothing is kept between invocations. A terminal delivery failure is handed
//! back to the host untouched; dead-lettering or dropping is the host's call.

use std::sync::Arc;
use tracing::debug;

use crate::config::Config;
use crate::flusher::{DeliveryError, LogsPusher, LokiFlusher};
use crate::trace_item::TraceItem;
use crate::transformer::transform_batch;

pub struct TailHandler<P> {
    pusher: P,
}

impl<P: LogsPusher + Sync> TailHandler<P> {
    pub fn new(pusher: P) -> Self {
        TailHandler { pusher }
    }

    pub async fn handle(&self, events: &[TraceItem]) -> Result<(), DeliveryError> {
        let request = transform_batch(events);
        debug!(
            "LOKI | Transformed {} events into {} streams",
            events.len(),
            request.streams.len()
        );
        self.pusher.push(&request).await
    }
}

impl TailHandler<LokiFlusher> {
    #[must_use]
    pub fn from_config(config: Arc<Config>) -> Self {
        TailHandler::new(LokiFlusher::new(config))
    }
}

/// Handles one tail invocation with a flusher built from `config`.
pub async fn tail(events: &[TraceItem], config: Arc<Config>) -> Result<(), DeliveryError> {
    TailHandler::from_config(config).handle(events).await
}
