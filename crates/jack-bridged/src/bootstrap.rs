//! Bridge bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use jack_bridge_config::Config;

use crate::engine::EngineBackend;
use crate::health::HealthReporter;
use crate::manager::ConnectionManager;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::watchdog::{Watchdog, WatchdogSettings};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the bridge configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when no valid configuration is available.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that reads defaults, configuration files, environment and flags.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Result of a successful bootstrap: configuration, telemetry and the
/// shared connection manager, not yet connected to the engine.
pub struct Bridge {
    config: Config,
    manager: Arc<ConnectionManager>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Bridge {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Shared connection manager.
    #[must_use]
    pub fn manager(&self) -> Arc<ConnectionManager> {
        Arc::clone(&self.manager)
    }

    /// Builds the watchdog for this bridge using the configured cadence.
    #[must_use]
    pub fn watchdog(&self) -> Watchdog {
        Watchdog::new(
            self.manager(),
            Arc::clone(&self.reporter),
            WatchdogSettings::from_config(&self.config),
        )
    }
}

/// Bootstraps the bridge using the supplied collaborators.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration or telemetry fails; the
/// failure is also reported through `reporter`.
pub fn bootstrap_with<B>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    backend: B,
) -> Result<Bridge, BootstrapError>
where
    B: EngineBackend + 'static,
{
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let manager = Arc::new(ConnectionManager::new(backend, Arc::clone(&reporter)));
    reporter.bootstrap_succeeded(&config);
    Ok(Bridge {
        config,
        manager,
        telemetry,
        reporter,
    })
}
