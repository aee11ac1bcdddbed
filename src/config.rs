//! Service configuration loaded from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, ServiceError};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Address the HTTP listener binds to, as `host:port`.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Upper bound on draining in-flight requests at shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Expose Prometheus metrics at `/metrics`.
    #[serde(default)]
    pub metrics_enabled: bool,

    // === Logging ===
    /// Log filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            metrics_enabled: false,
            rust_log: default_log_level(),
            log_json: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        let port = self
            .bind_addr
            .rsplit_once(':')
            .filter(|(host, _)| !host.is_empty())
            .map(|(_, port)| port);
        if port.and_then(|p| p.parse::<u16>().ok()).is_none() {
            return Err(ServiceError::InvalidConfig(format!(
                "BIND_ADDR `{}` must be host:port",
                self.bind_addr
            )));
        }

        if self.shutdown_timeout_secs == 0 {
            return Err(ServiceError::InvalidConfig(
                "SHUTDOWN_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the listener address; hostnames such as `localhost` are looked up.
    pub async fn resolve_addr(&self) -> Result<SocketAddr> {
        let mut addrs = tokio::net::lookup_host(self.bind_addr.as_str())
            .await
            .map_err(|e| {
                ServiceError::InvalidConfig(format!("cannot resolve BIND_ADDR `{}`: {}", self.bind_addr, e))
            })?;
        addrs.next().ok_or_else(|| {
            ServiceError::InvalidConfig(format!("BIND_ADDR `{}` resolved to nothing", self.bind_addr))
        })
    }

    /// Grace period for draining at shutdown.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
