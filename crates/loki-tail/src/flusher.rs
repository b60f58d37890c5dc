// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Delivery of push requests to Loki.
//!
//! A request is sent as one JSON body and either lands whole or fails whole.
//! Attempts are strictly sequential so the sink never sees two copies of the
//! same batch in flight:
//!
//! ```text
//!   Pending ──> Sent ──> 204 ──────────────> Success
//!                 │
//!                 └──> other status / network error
//!                        ├─ retries left ──> wait ──> Pending
//!                        └─ exhausted ─────────────> DeliveryError::Exhausted
//! ```

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::http::get_client;
use crate::push::PushRequest;

/// Header carrying the Loki tenant.
pub const TENANT_HEADER: &str = "X-Scope-OrgID";

/// Why a single attempt failed. Both kinds are retried the same way.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("unexpected status {status}: {body:?}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Terminal outcome of a push that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("failed to serialize push request: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("push failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: AttemptError,
    },
}

impl DeliveryError {
    /// Number of requests sent before giving up.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryError::Payload(_) => 0,
            DeliveryError::Exhausted { attempts, .. } => *attempts,
        }
    }
}

#[async_trait]
pub trait LogsPusher {
    /// Delivers `request`, retrying per the configured strategy.
    /// An empty request succeeds without touching the network.
    async fn push(&self, request: &PushRequest) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone)]
pub struct LokiFlusher {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl LokiFlusher {
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        let client = get_client(&config);
        LokiFlusher { client, config }
    }

    async fn send(&self, body: Vec<u8>) -> Result<(), AttemptError> {
        let resp = self
            .client
            .post(&self.config.push_url)
            .header(AUTHORIZATION, self.config.credentials.authorization())
            .header(CONTENT_TYPE, "application/json")
            .header(TENANT_HEADER, &self.config.tenant_id)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        Err(AttemptError::UnexpectedStatus {
            status,
            body: resp.text().await.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl LogsPusher for LokiFlusher {
    async fn push(&self, request: &PushRequest) -> Result<(), DeliveryError> {
        if request.is_empty() {
            debug!("LOKI | No streams to push");
            return Ok(());
        }

        let body = request.to_json()?;
        let strategy = self.config.retry_strategy;
        let max_attempts = strategy.max_attempts();
        let time = Instant::now();
        let mut attempts = 1;

        loop {
            match self.send(body.clone()).await {
                Ok(()) => {
                    debug!(
                        "LOKI | Pushed {} streams ({} lines) in {} ms after {} attempt(s)",
                        request.streams.len(),
                        request.line_count(),
                        time.elapsed().as_millis(),
                        attempts
                    );
                    return Ok(());
                }
                Err(e) if attempts >= max_attempts => {
                    error!(
                        "LOKI | Failed to push after {} ms and {} attempts: {}",
                        time.elapsed().as_millis(),
                        attempts,
                        e
                    );
                    return Err(DeliveryError::Exhausted { attempts, last: e });
                }
                Err(e) => {
                    let delay = strategy.delay(attempts);
                    warn!(
                        "LOKI | Push attempt {} of {} failed: {}, retrying in {} ms",
                        attempts,
                        max_attempts,
                        e,
                        delay.as_millis()
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempts += 1;
                }
            }
        }
    }
}
