// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, process::ExitCode, sync::Arc};
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use loki_tail::{config::Config, logger::Formatter, tail::tail, trace_item::TraceItem};

#[tokio::main]
pub async fn main() -> ExitCode {
    let log_level = env::var("LOKI_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("h2=off,hyper=off,rustls=off,{log_level}");
    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("could not parse log level {log_level:?}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_ansi(false)
        .event_format(Formatter)
        .with_env_filter(filter)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    debug!("Logging subsystem enabled");

    let config = match Config::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut input = Vec::new();
    if let Err(e) = tokio::io::stdin().read_to_end(&mut input).await {
        error!("Failed to read tail events from stdin: {e}");
        return ExitCode::FAILURE;
    }

    let events: Vec<TraceItem> = match serde_json::from_slice(&input) {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to parse tail events: {e}");
            return ExitCode::FAILURE;
        }
    };

    match tail(&events, config).await {
        Ok(()) => {
            info!("Forwarded {} tail events", events.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Tail invocation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
