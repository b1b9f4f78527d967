//! Background loop that keeps the engine session alive.
//!
//! The watchdog runs on its own thread and shares the [`ConnectionManager`]
//! with request workers. Each tick probes the session and, when the probe
//! fails, tears it down and opens a fresh one. Reconnect failures are
//! reported and retried on the next tick; they never stop the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use jack_bridge_config::Config;

use crate::health::HealthReporter;
use crate::manager::ConnectionManager;

const WATCHDOG_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::watchdog");

/// Errors surfaced while running the watchdog thread.
#[derive(Debug, Error)]
pub enum WatchdogError {
    /// The watchdog thread could not be started.
    #[error("failed to spawn watchdog thread: {source}")]
    Spawn {
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The watchdog thread panicked.
    #[error("watchdog thread panicked")]
    ThreadPanic,
}

/// Timing parameters for the watchdog loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogSettings {
    /// Time between ticks.
    pub interval: Duration,
    /// Sleep step between cancellation checks.
    pub poll: Duration,
}

impl WatchdogSettings {
    /// Reads the timing parameters from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.watchdog_interval(),
            poll: config.watchdog_poll(),
        }
    }
}

/// Probes the engine periodically and rebuilds the session when it fails.
pub struct Watchdog {
    manager: Arc<ConnectionManager>,
    reporter: Arc<dyn HealthReporter>,
    settings: WatchdogSettings,
}

impl Watchdog {
    /// Builds a watchdog over the shared manager.
    #[must_use]
    pub fn new(
        manager: Arc<ConnectionManager>,
        reporter: Arc<dyn HealthReporter>,
        settings: WatchdogSettings,
    ) -> Self {
        Self {
            manager,
            reporter,
            settings,
        }
    }

    /// Runs one watchdog cycle and returns whether the engine is healthy
    /// afterwards.
    pub fn tick(&self) -> bool {
        if self.manager.probe() {
            debug!(target: WATCHDOG_TARGET, "JACK session healthy");
            return true;
        }

        self.reporter.reconnect_attempted();
        self.manager.shutdown();
        if self.manager.initialize() {
            self.reporter.reconnect_succeeded();
            true
        } else {
            self.reporter.reconnect_failed();
            false
        }
    }

    /// Moves the watchdog onto a background thread.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::Spawn`] when the thread cannot be created.
    pub fn spawn(self) -> Result<WatchdogHandle, WatchdogError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name(String::from("jack-bridge-watchdog"))
            .spawn(move || self.run(&flag))
            .map_err(|source| WatchdogError::Spawn { source })?;
        Ok(WatchdogHandle {
            shutdown,
            handle: Some(handle),
        })
    }

    fn run(&self, shutdown: &AtomicBool) {
        info!(
            target: WATCHDOG_TARGET,
            interval_ms = self.settings.interval.as_millis(),
            "watchdog active"
        );
        let mut waited = Duration::ZERO;
        loop {
            thread::sleep(self.settings.poll);
            if shutdown.load(Ordering::SeqCst) {
                break;
            }
            waited += self.settings.poll;
            if waited >= self.settings.interval {
                waited = Duration::ZERO;
                self.tick();
            }
        }
        debug!(target: WATCHDOG_TARGET, "watchdog stopped");
    }
}

/// Handle to the background watchdog thread.
pub struct WatchdogHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl WatchdogHandle {
    /// Asks the loop to stop at its next poll step.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the loop to exit.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::ThreadPanic`] when the thread panicked.
    pub fn join(mut self) -> Result<(), WatchdogError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WatchdogError::ThreadPanic),
            None => Ok(()),
        }
    }
}

impl Drop for WatchdogHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}
