//! HTTP bridge in front of a JACK audio server.
//!
//! The daemon keeps one engine session behind a [`ConnectionManager`] and
//! exposes port listing and connection routing over a small HTTP/1.1 API.
//! A [`Watchdog`] thread probes the session on a fixed cadence and rebuilds
//! it when the server goes away, so the bridge can start before JACK and
//! survive JACK restarts.
//!
//! Startup follows a fixed order: configuration is resolved through
//! [`jack_bridge_config`], telemetry is installed, the listener is bound,
//! the first engine session is attempted, and finally the watchdog starts.
//! Only configuration, telemetry and listener failures are fatal; an absent
//! engine leaves the bridge serving `disconnected` answers until the
//! watchdog reconnects.

mod bootstrap;
mod dispatch;
mod engine;
mod health;
mod manager;
mod process;
mod telemetry;
mod transport;
mod watchdog;

pub use bootstrap::{
    Bridge, BootstrapError, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use engine::{
    ConnectOutcome, Connection, EngineBackend, EngineError, EngineHandle, EngineInfo, JackTools,
    JackToolsBackend, Port, PortDirection, PortKind,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use manager::{ConnectionManager, ConnectionState, EngineStatus, ManagerError};
pub use process::{LaunchError, run_bridge};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;
pub use watchdog::{Watchdog, WatchdogError, WatchdogHandle, WatchdogSettings};

#[cfg(test)]
mod tests;
