//! Shared configuration for the JACK bridge daemon.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, then an
//! optional configuration file, then `JACK_BRIDGE_*` environment variables,
//! then command-line flags. The daemon reads the resolved [`Config`] once at
//! startup and hands plain values to each component.

mod defaults;
mod endpoint;
mod logging;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CLIENT_NAME, DEFAULT_ENGINE_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_LOG_FILTER,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DEFAULT_WATCHDOG_INTERVAL_SECS,
    DEFAULT_WATCHDOG_POLL_MS, VERBOSE_LOG_FILTER, default_listen_endpoint, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use endpoint::{EndpointParseError, ListenEndpoint};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "JACK_BRIDGE")]
pub struct Config {
    /// Address the HTTP API listens on.
    #[serde(default = "default_listen_endpoint")]
    pub listen: ListenEndpoint,
    /// JACK server name; exported to the tools as `JACK_DEFAULT_SERVER`.
    #[serde(default)]
    pub jack_server: Option<String>,
    /// Directory holding the JACK command-line tools. `PATH` is used when unset.
    #[serde(default)]
    pub jack_tools_dir: Option<Utf8PathBuf>,
    /// Upper bound for a single engine call, in milliseconds.
    #[serde(default = "defaults::default_engine_timeout_ms")]
    pub engine_timeout_ms: u64,
    /// Period between watchdog health checks, in seconds.
    #[serde(default = "defaults::default_watchdog_interval_secs")]
    pub watchdog_interval_secs: u64,
    /// Step at which the watchdog checks for cancellation, in milliseconds.
    #[serde(default = "defaults::default_watchdog_poll_ms")]
    pub watchdog_poll_ms: u64,
    /// Client name reported alongside engine metadata.
    #[serde(default = "defaults::default_client_name")]
    pub client_name: String,
    /// Cap on concurrently served connections.
    #[serde(default = "defaults::default_max_connections")]
    pub max_connections: usize,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Forces the `debug` filter regardless of `log_filter`.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen_endpoint(),
            jack_server: None,
            jack_tools_dir: None,
            engine_timeout_ms: DEFAULT_ENGINE_TIMEOUT_MS,
            watchdog_interval_secs: DEFAULT_WATCHDOG_INTERVAL_SECS,
            watchdog_poll_ms: DEFAULT_WATCHDOG_POLL_MS,
            client_name: DEFAULT_CLIENT_NAME.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            verbose: false,
        }
    }
}

impl Config {
    /// Address the HTTP API listens on.
    #[must_use]
    pub fn listen(&self) -> &ListenEndpoint {
        &self.listen
    }

    /// JACK server name, when one was configured.
    #[must_use]
    pub fn jack_server(&self) -> Option<&str> {
        self.jack_server.as_deref()
    }

    /// Directory holding the JACK tools, when one was configured.
    #[must_use]
    pub fn jack_tools_dir(&self) -> Option<&Utf8Path> {
        self.jack_tools_dir.as_deref()
    }

    /// Upper bound for a single engine call.
    #[must_use]
    pub const fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout_ms)
    }

    /// Period between watchdog health checks.
    #[must_use]
    pub const fn watchdog_interval(&self) -> Duration {
        Duration::from_secs(self.watchdog_interval_secs)
    }

    /// Step at which the watchdog checks for cancellation.
    ///
    /// Never zero, so the watchdog cannot spin.
    #[must_use]
    pub fn watchdog_poll(&self) -> Duration {
        Duration::from_millis(self.watchdog_poll_ms.max(1))
    }

    /// Client name reported alongside engine metadata.
    #[must_use]
    pub fn client_name(&self) -> &str {
        self.client_name.as_str()
    }

    /// Cap on concurrently served connections; at least one.
    #[must_use]
    pub fn max_connections(&self) -> usize {
        self.max_connections.max(1)
    }

    /// Effective log filter, honouring the verbose switch.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            self.log_filter.as_str()
        }
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
