//! Shared reqwest client construction policy.
//!
//! API calls and attachment downloads use separate clients built here so they
//! agree on timeouts, compression, user-agent and proxy handling.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::warn;

use crate::user_agent;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large exports).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Connect and read timeouts for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Connect timeout in seconds.
    pub connect_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

/// Builds a reqwest client with the shared policy.
///
/// Some sandboxed macOS environments panic while reading system proxy
/// settings; in that case the build is retried with system lookup disabled
/// and proxies taken from the environment only.
///
/// # Errors
///
/// Returns the reqwest builder error when construction fails.
pub(crate) fn build_http_client(timeouts: HttpTimeouts) -> Result<Client, reqwest::Error> {
    match try_build_client(timeouts, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Build(error)) => Err(error),
        Err(BuildClientFailure::Panic) => {
            warn!("HTTP client builder panicked loading system proxy settings; using env-proxy fallback");
            match try_build_client(timeouts, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Build(error)) => Err(error),
                // Second build never consults system settings; fall back to a bare client.
                Err(BuildClientFailure::Panic) => base_builder(timeouts).no_proxy().build(),
            }
        }
    }
}

fn try_build_client(
    timeouts: HttpTimeouts,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(timeouts);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(timeouts: HttpTimeouts) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.read_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    for (names, scheme) in [
        (["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"], "https"),
        (["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"], "http"),
    ] {
        let Some(value) = names.iter().find_map(|name| {
            std::env::var(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        }) else {
            continue;
        };
        let proxy = if scheme == "https" {
            Proxy::https(&value)
        } else {
            Proxy::http(&value)
        };
        if let Ok(proxy) = proxy {
            builder = builder.proxy(proxy);
        }
    }
    builder
}
