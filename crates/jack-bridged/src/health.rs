//! Structured health reporting for bridge lifecycle events.

use std::sync::Arc;

use jack_bridge_config::Config;

use crate::bootstrap::BootstrapError;
use crate::engine::{EngineError, EngineInfo};

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked when a session is opened and its first probe passed.
    fn engine_connected(&self, info: &EngineInfo);

    /// Invoked when a session could not be opened.
    fn engine_unavailable(&self, error: &EngineError);

    /// Invoked when a previously healthy session stops answering.
    fn engine_lost(&self, error: &EngineError);

    /// Invoked after a session is closed.
    fn engine_closed(&self);

    /// Invoked when the watchdog starts rebuilding the session.
    fn reconnect_attempted(&self);

    /// Invoked when the watchdog restored the session.
    fn reconnect_succeeded(&self);

    /// Invoked when the watchdog could not restore the session.
    fn reconnect_failed(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn engine_connected(&self, info: &EngineInfo) {
        (**self).engine_connected(info);
    }

    fn engine_unavailable(&self, error: &EngineError) {
        (**self).engine_unavailable(error);
    }

    fn engine_lost(&self, error: &EngineError) {
        (**self).engine_lost(error);
    }

    fn engine_closed(&self) {
        (**self).engine_closed();
    }

    fn reconnect_attempted(&self) {
        (**self).reconnect_attempted();
    }

    fn reconnect_succeeded(&self) {
        (**self).reconnect_succeeded();
    }

    fn reconnect_failed(&self) {
        (**self).reconnect_failed();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting bridge bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            listen = %config.listen(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "bridge bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "bridge bootstrap failed"
        );
    }

    fn engine_connected(&self, info: &EngineInfo) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "engine_connected",
            sample_rate = info.sample_rate,
            buffer_size = info.buffer_size,
            client = %info.client_name,
            "connected to JACK"
        );
    }

    fn engine_unavailable(&self, error: &EngineError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "engine_unavailable",
            error = %error,
            "JACK is not available"
        );
    }

    fn engine_lost(&self, error: &EngineError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "engine_lost",
            error = %error,
            "lost connection to JACK"
        );
    }

    fn engine_closed(&self) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "engine_closed",
            "JACK session closed"
        );
    }

    fn reconnect_attempted(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "reconnect_attempted",
            "attempting to reconnect to JACK"
        );
    }

    fn reconnect_succeeded(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "reconnect_succeeded",
            "reconnected to JACK"
        );
    }

    fn reconnect_failed(&self) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "reconnect_failed",
            "reconnect to JACK failed; will retry"
        );
    }
}
