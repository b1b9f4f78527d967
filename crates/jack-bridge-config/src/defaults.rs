use crate::endpoint::ListenEndpoint;
use crate::logging::LogFormat;

/// Default TCP port for the bridge API.
pub const DEFAULT_PORT: u16 = 6666;

/// Default bind host: every interface, so containers and LAN clients can reach
/// the bridge.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Log filter applied when verbose output is requested.
pub const VERBOSE_LOG_FILTER: &str = "debug";

/// Default upper bound for a single engine call, in milliseconds.
pub const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 10_000;

/// Default period between watchdog health checks, in seconds.
pub const DEFAULT_WATCHDOG_INTERVAL_SECS: u64 = 30;

/// Default step at which the watchdog checks for cancellation, in milliseconds.
pub const DEFAULT_WATCHDOG_POLL_MS: u64 = 1_000;

/// Default client name reported for the engine session.
pub const DEFAULT_CLIENT_NAME: &str = "jack-bridge";

/// Default cap on concurrently served connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;

/// Computes the default listen endpoint.
#[must_use]
pub fn default_listen_endpoint() -> ListenEndpoint {
    ListenEndpoint::new(DEFAULT_HOST, DEFAULT_PORT)
}

/// Default log filter expression used by the binary.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

pub(crate) fn default_engine_timeout_ms() -> u64 {
    DEFAULT_ENGINE_TIMEOUT_MS
}

pub(crate) fn default_watchdog_interval_secs() -> u64 {
    DEFAULT_WATCHDOG_INTERVAL_SECS
}

pub(crate) fn default_watchdog_poll_ms() -> u64 {
    DEFAULT_WATCHDOG_POLL_MS
}

pub(crate) fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_owned()
}

pub(crate) fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}
