//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::sync::Mutex;

use jack_bridge_config::Config;

use crate::bootstrap::BootstrapError;
use crate::engine::{EngineError, EngineInfo};
use crate::health::HealthReporter;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    EngineConnected(u32),
    EngineUnavailable(String),
    EngineLost(String),
    EngineClosed,
    ReconnectAttempted,
    ReconnectSucceeded,
    ReconnectFailed,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// Returns whether `event` was recorded at least once.
    #[must_use]
    pub fn saw(&self, event: &HealthEvent) -> bool {
        self.events().contains(event)
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn engine_connected(&self, info: &EngineInfo) {
        self.record(HealthEvent::EngineConnected(info.sample_rate));
    }

    fn engine_unavailable(&self, error: &EngineError) {
        self.record(HealthEvent::EngineUnavailable(error.to_string()));
    }

    fn engine_lost(&self, error: &EngineError) {
        self.record(HealthEvent::EngineLost(error.to_string()));
    }

    fn engine_closed(&self) {
        self.record(HealthEvent::EngineClosed);
    }

    fn reconnect_attempted(&self) {
        self.record(HealthEvent::ReconnectAttempted);
    }

    fn reconnect_succeeded(&self) {
        self.record(HealthEvent::ReconnectSucceeded);
    }

    fn reconnect_failed(&self) {
        self.record(HealthEvent::ReconnectFailed);
    }
}
