// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! reqwest client construction for pushes.
//!
//! With the `fips` feature the client is built on a preconfigured rustls
//! config that must come from a FIPS-compliant crypto provider. Without it,
//! reqwest's default rustls setup is used.

use reqwest::ClientBuilder;
use std::error::Error;
use std::time::Duration;
#[cfg(feature = "fips")]
use tracing::debug;
use tracing::error;

use crate::config::Config;

/// Builds the client used for pushes.
///
/// An invalid proxy is logged and ignored rather than failing the invocation.
#[must_use]
pub fn get_client(config: &Config) -> reqwest::Client {
    match build_client(config.https_proxy.as_deref(), config.timeout) {
        Ok(client) => client,
        Err(e) => {
            error!(
                "LOKI | Unable to parse proxy configuration: {}, falling back to direct connection",
                e
            );
            match build_client(None, config.timeout) {
                Ok(client) => client,
                Err(inner) => {
                    error!(
                        "LOKI | Failed to build HTTP client without proxy: {}, using reqwest defaults",
                        inner
                    );
                    reqwest::Client::new()
                }
            }
        }
    }
}

fn build_client(
    https_proxy: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut builder = create_reqwest_client_builder()?.timeout(timeout);
    if let Some(proxy) = https_proxy {
        builder = builder.proxy(reqwest::Proxy::https(proxy)?);
    }
    Ok(builder.build()?)
}

#[cfg(not(feature = "fips"))]
pub fn create_reqwest_client_builder() -> Result<ClientBuilder, Box<dyn Error>> {
    Ok(reqwest::Client::builder().use_rustls_tls())
}

/// Loads native root certificates and checks that both the installed crypto
/// provider and the resulting TLS config are FIPS-compliant.
#[cfg(feature = "fips")]
pub fn create_reqwest_client_builder() -> Result<ClientBuilder, Box<dyn Error>> {
    // The host installs the provider, e.g. rustls::crypto::default_fips_provider().install_default()
    let provider =
        rustls::crypto::CryptoProvider::get_default().ok_or("No crypto provider configured")?;

    if !provider.fips() {
        return Err("Crypto provider is not FIPS-compliant".into());
    }

    let mut root_cert_store = rustls::RootCertStore::empty();
    let native_certs = rustls_native_certs::load_native_certs();
    let mut valid_count = 0;
    for cert in native_certs.certs {
        match root_cert_store.add(cert) {
            Ok(()) => valid_count += 1,
            Err(err) => {
                debug!("LOKI | Failed to parse certificate: {:?}", err);
            }
        }
    }
    if valid_count == 0 {
        return Err("No valid certificates found in native root store".into());
    }

    let config = rustls::ClientConfig::builder_with_provider(provider.clone())
        .with_protocol_versions(rustls::ALL_VERSIONS)
        .map_err(|_| "Failed to set protocol versions")?
        .with_root_certificates(root_cert_store)
        .with_no_client_auth();

    if !config.fips() {
        return Err("The final TLS configuration is not FIPS-compliant".into());
    }

    Ok(reqwest::Client::builder().use_preconfigured_tls(config))
}
