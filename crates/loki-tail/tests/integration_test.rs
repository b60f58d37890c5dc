// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use loki_tail::{
    config::{Config, Credentials},
    flusher::DeliveryError,
    retry::RetryStrategy,
    tail::tail,
    trace_item::TraceItem,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const PUSH_PATH: &str = "/loki/api/v1/push";

fn config(url: String) -> Arc<Config> {
    let mut config = Config::new(url, Credentials::Encoded("dXNlcjpwYXNz".to_string()));
    config.retry_strategy = RetryStrategy::Immediate(2);
    config.timeout = Duration::from_secs(5);
    Arc::new(config)
}

fn host_batch() -> Vec<TraceItem> {
    let raw = json!([
        {
            "outcome": "ok",
            "scriptName": "app1",
            "eventTimestamp": 1_700_000_000_000_i64,
            "logs": [
                { "level": "info", "timestamp": 1000, "message": ["a"] },
                { "level": "debug", "timestamp": 1500, "message": ["noise"] },
                { "level": "info", "timestamp": 2000, "message": ["b", { "extra": true }] },
                { "level": "warn", "timestamp": 2500, "message": ["careful"] }
            ],
            "exceptions": []
        },
        {
            "outcome": "exceededCpu",
            "scriptName": "app2",
            "logs": [ { "level": "info", "timestamp": 1, "message": ["dropped"] } ],
            "exceptions": []
        },
        {
            "outcome": "exception",
            "scriptName": "app1",
            "logs": [ { "level": "error", "timestamp": 4, "message": ["about to fail"] } ],
            "exceptions": [ { "timestamp": 5, "name": "TypeError", "message": "bad" } ]
        }
    ]);
    serde_json::from_value(raw).expect("valid host batch")
}

#[tokio::test]
async fn test_tail_delivers_host_batch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PUSH_PATH)
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .match_header("content-type", "application/json")
        .match_header("x-scope-orgid", "1")
        .match_body(Matcher::Json(json!({
            "streams": [
                {
                    "stream": { "level": "info", "outcome": "ok", "app": "app1" },
                    "values": [["1000000000", "a"], ["2000000000", "b"]]
                },
                {
                    "stream": { "level": "warn", "outcome": "ok", "app": "app1" },
                    "values": [["2500000000", "careful"]]
                },
                {
                    "stream": { "level": "error", "outcome": "exception", "app": "app1" },
                    "values": [["4000000", "about to fail"]]
                },
                {
                    "stream": { "level": "error", "outcome": "exception", "app": "app1" },
                    "values": [["5000000", "TypeError: bad"]]
                }
            ]
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let result = tail(&host_batch(), config(format!("{}{PUSH_PATH}", server.url()))).await;

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_tail_skips_network_when_nothing_to_ship() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let batch: Vec<TraceItem> = serde_json::from_value(json!([
        { "outcome": "canceled", "scriptName": "app1", "logs": [], "exceptions": [] },
        { "outcome": "ok", "scriptName": null, "logs": [], "exceptions": [] }
    ]))
    .expect("valid host batch");

    let result = tail(&batch, config(format!("{}{PUSH_PATH}", server.url()))).await;

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_tail_surfaces_terminal_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PUSH_PATH)
        .with_status(400)
        .with_body("entry out of order")
        .expect(3)
        .create_async()
        .await;

    let err = tail(&host_batch(), config(format!("{}{PUSH_PATH}", server.url())))
        .await
        .unwrap_err();

    assert!(matches!(err, DeliveryError::Exhausted { attempts: 3, .. }));
    assert!(err.to_string().contains("entry out of order"));
    mock.assert_async().await;
}
