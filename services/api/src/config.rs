use std::{net::SocketAddr, time::Duration};

use anyhow::{Context, Result};

use crate::db::DbConfig;

/// Service configuration (env-driven).
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen address.
    pub listen_addr: SocketAddr,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Run migrations at startup.
    pub dev_mode: bool,

    /// Upper bound on a single request, store calls included.
    pub request_timeout: Duration,

    /// Install the Prometheus recorder and serve `/metrics`.
    pub metrics_enabled: bool,

    pub database: DbConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("EVTBOOK_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
            .context("EVTBOOK_LISTEN_ADDR must be a socket address (host:port).")?;

        let log_level = lookup("EVTBOOK_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let dev_mode = lookup("EVTBOOK_DEV").is_some_and(|v| is_truthy(&v));

        let request_timeout_secs: u64 = lookup("EVTBOOK_REQUEST_TIMEOUT_SECS")
            .map(|v| v.parse())
            .transpose()
            .context("EVTBOOK_REQUEST_TIMEOUT_SECS must be an integer (seconds).")?
            .unwrap_or(30);
        let request_timeout = Duration::from_secs(request_timeout_secs.max(1));

        let metrics_enabled = lookup("EVTBOOK_METRICS").is_none_or(|v| is_truthy(&v));

        let database = DbConfig::from_lookup(&lookup)?;

        Ok(Self {
            listen_addr,
            log_level,
            dev_mode,
            request_timeout,
            metrics_enabled,
            database,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
