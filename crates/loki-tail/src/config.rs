// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::retry::{RetryStrategy, DEFAULT_BACKOFF_BASE_MS, DEFAULT_MAX_RETRIES};

/// Tenant sent in `X-Scope-OrgID` when none is configured.
pub const DEFAULT_TENANT_ID: &str = "1";

/// Per-attempt request timeout when none is configured.
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),

    #[error("either LOKI_CREDENTIALS or LOKI_USERNAME and LOKI_PASSWORD must be set")]
    MissingCredentials,

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Basic auth credentials for the push endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Already base64 encoded `user:password`.
    Encoded(String),
    UserPassword { username: String, password: String },
}

impl Credentials {
    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> String {
        match self {
            Credentials::Encoded(encoded) => format!("Basic {encoded}"),
            Credentials::UserPassword { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Encoded(_) => write!(f, "Credentials::Encoded(<redacted>)"),
            Credentials::UserPassword { username, .. } => {
                write!(f, "Credentials::UserPassword({username}, <redacted>)")
            }
        }
    }
}

/// Where and how pushes are delivered. Read-only once built.
#[derive(Debug, Clone)]
pub struct Config {
    pub push_url: String,
    pub credentials: Credentials,
    /// Value of the `X-Scope-OrgID` header.
    pub tenant_id: String,
    pub retry_strategy: RetryStrategy,
    /// Timeout applied to each attempt.
    pub timeout: Duration,
    pub https_proxy: Option<String>,
}

impl Config {
    /// A config with defaults for everything except the endpoint.
    pub fn new(push_url: impl Into<String>, credentials: Credentials) -> Self {
        Config {
            push_url: push_url.into(),
            credentials,
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            retry_strategy: RetryStrategy::default(),
            timeout: Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS),
            https_proxy: None,
        }
    }

    pub fn from_env() -> Result<Config, ConfigError> {
        let push_url =
            non_empty_var("LOKI_PUSH_URL").ok_or(ConfigError::MissingVar("LOKI_PUSH_URL"))?;

        let credentials = match non_empty_var("LOKI_CREDENTIALS") {
            Some(encoded) => Credentials::Encoded(encoded),
            None => match (non_empty_var("LOKI_USERNAME"), env::var("LOKI_PASSWORD").ok()) {
                (Some(username), Some(password)) => {
                    Credentials::UserPassword { username, password }
                }
                _ => return Err(ConfigError::MissingCredentials),
            },
        };

        let tenant_id =
            non_empty_var("LOKI_TENANT_ID").unwrap_or_else(|| DEFAULT_TENANT_ID.to_string());

        let max_retries = parse_var("LOKI_MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES);
        let backoff_base_ms =
            parse_var("LOKI_RETRY_BACKOFF_BASE_MS")?.unwrap_or(DEFAULT_BACKOFF_BASE_MS);
        let retry_strategy = match non_empty_var("LOKI_RETRY_BACKOFF") {
            Some(kind) => RetryStrategy::from_parts(&kind, max_retries, backoff_base_ms).ok_or(
                ConfigError::InvalidValue {
                    name: "LOKI_RETRY_BACKOFF",
                    value: kind,
                },
            )?,
            None => RetryStrategy::ExponentialBackoff(max_retries, backoff_base_ms),
        };

        let timeout_secs =
            parse_var("LOKI_PUSH_TIMEOUT_SECS")?.unwrap_or(DEFAULT_PUSH_TIMEOUT_SECS);

        Ok(Config {
            push_url,
            credentials,
            tenant_id,
            retry_strategy,
            timeout: Duration::from_secs(timeout_secs),
            https_proxy: non_empty_var("LOKI_PROXY_HTTPS")
                .or_else(|| non_empty_var("HTTPS_PROXY")),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match non_empty_var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
