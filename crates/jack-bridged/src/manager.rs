//! Ownership and serialisation of the single engine session.
//!
//! [`ConnectionManager`] holds at most one [`EngineHandle`] together with the
//! [`ConnectionState`] describing it, both behind one mutex. Request workers
//! and the watchdog share the manager through an `Arc`; every public method
//! takes the lock for its whole duration and releases it before returning,
//! so engine calls never overlap.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

use crate::engine::{
    ConnectOutcome, Connection, EngineBackend, EngineError, EngineHandle, EngineInfo, Port,
};
use crate::health::HealthReporter;

const MANAGER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::engine");

/// Lifecycle state of the engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session has been opened, or the manager was shut down.
    Uninitialized,
    /// A session is open and its last probe succeeded.
    Connected,
    /// The session is absent or its last probe failed.
    Disconnected,
}

impl ConnectionState {
    /// Wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reported by mutating manager operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// No connected session exists.
    #[error("JACK not running")]
    EngineUnavailable,
    /// The session exists but the engine rejected the call.
    #[error("engine call failed: {source}")]
    EngineCallFailed {
        /// Error reported by the engine handle.
        #[source]
        source: EngineError,
    },
}

impl From<EngineError> for ManagerError {
    fn from(source: EngineError) -> Self {
        Self::EngineCallFailed { source }
    }
}

/// Snapshot returned by [`ConnectionManager::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    /// State after the probe.
    pub state: ConnectionState,
    /// Engine parameters when connected.
    pub info: Option<EngineInfo>,
}

impl EngineStatus {
    /// Returns `true` when the engine answered the probe.
    #[must_use]
    pub fn running(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

struct EngineSlot {
    handle: Option<Box<dyn EngineHandle>>,
    state: ConnectionState,
    info: Option<EngineInfo>,
}

impl EngineSlot {
    fn probe(&mut self, reporter: &dyn HealthReporter) -> bool {
        let Some(handle) = self.handle.as_deref_mut() else {
            return false;
        };
        match handle.probe() {
            Ok(info) => {
                self.state = ConnectionState::Connected;
                self.info = Some(info);
                true
            }
            Err(error) => {
                if self.state == ConnectionState::Connected {
                    reporter.engine_lost(&error);
                }
                self.state = ConnectionState::Disconnected;
                self.info = None;
                false
            }
        }
    }

    fn close(&mut self, reporter: &dyn HealthReporter) {
        self.info = None;
        if let Some(mut handle) = self.handle.take() {
            handle.close();
            reporter.engine_closed();
        }
    }

    fn connected(&mut self) -> Result<&mut (dyn EngineHandle + 'static), ManagerError> {
        if self.state != ConnectionState::Connected {
            return Err(ManagerError::EngineUnavailable);
        }
        self.handle
            .as_deref_mut()
            .ok_or(ManagerError::EngineUnavailable)
    }
}

/// Thread-safe owner of the engine session.
pub struct ConnectionManager {
    backend: Box<dyn EngineBackend>,
    reporter: Arc<dyn HealthReporter>,
    slot: Mutex<EngineSlot>,
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("method", &self.backend.method())
            .finish_non_exhaustive()
    }
}

impl ConnectionManager {
    /// Builds a manager in the [`ConnectionState::Uninitialized`] state.
    pub fn new(backend: impl EngineBackend + 'static, reporter: Arc<dyn HealthReporter>) -> Self {
        Self {
            backend: Box::new(backend),
            reporter,
            slot: Mutex::new(EngineSlot {
                handle: None,
                state: ConnectionState::Uninitialized,
                info: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Label describing how the engine is driven.
    #[must_use]
    pub fn method(&self) -> &'static str {
        self.backend.method()
    }

    /// Current state without touching the engine.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.lock().state
    }

    /// Opens a session unless one is already connected.
    ///
    /// Returns `true` when the manager ends up connected. On failure any
    /// half-open session is discarded and the state becomes
    /// [`ConnectionState::Disconnected`].
    pub fn initialize(&self) -> bool {
        let mut slot = self.lock();
        if slot.state == ConnectionState::Connected && slot.handle.is_some() {
            return true;
        }
        slot.close(&*self.reporter);

        match self.open_session() {
            Ok((handle, info)) => {
                self.reporter.engine_connected(&info);
                slot.handle = Some(handle);
                slot.info = Some(info);
                slot.state = ConnectionState::Connected;
                true
            }
            Err(error) => {
                slot.state = ConnectionState::Disconnected;
                self.reporter.engine_unavailable(&error);
                false
            }
        }
    }

    fn open_session(&self) -> Result<(Box<dyn EngineHandle>, EngineInfo), EngineError> {
        let mut handle = self.backend.open()?;
        match handle.probe() {
            Ok(info) => Ok((handle, info)),
            Err(error) => {
                handle.close();
                Err(error)
            }
        }
    }

    /// Closes the session, if any, and returns to
    /// [`ConnectionState::Uninitialized`]. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let mut slot = self.lock();
        slot.close(&*self.reporter);
        slot.state = ConnectionState::Uninitialized;
    }

    /// Checks the engine is still answering.
    ///
    /// Never opens a session: without one this returns `false` and leaves the
    /// state untouched.
    pub fn probe(&self) -> bool {
        self.lock().probe(&*self.reporter)
    }

    /// Probes the engine and reports the resulting state and parameters.
    pub fn status(&self) -> EngineStatus {
        let mut slot = self.lock();
        slot.probe(&*self.reporter);
        EngineStatus {
            state: slot.state,
            info: slot.info.clone(),
        }
    }

    /// Lists the engine's ports, or nothing when not connected.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::EngineCallFailed`] when the engine call fails.
    pub fn list_ports(&self) -> Result<Vec<Port>, ManagerError> {
        let mut slot = self.lock();
        match slot.connected() {
            Ok(handle) => Ok(handle.ports()?),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Lists the engine's edges, or nothing when not connected.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::EngineCallFailed`] when the engine call fails.
    pub fn list_connections(&self) -> Result<Vec<Connection>, ManagerError> {
        let mut slot = self.lock();
        match slot.connected() {
            Ok(handle) => Ok(handle.connections()?),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Creates the edge `from -> to`. An existing edge is a success.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::EngineUnavailable`] when not connected and
    /// [`ManagerError::EngineCallFailed`] when the engine refuses the edge.
    pub fn connect(&self, from: &str, to: &str) -> Result<ConnectOutcome, ManagerError> {
        let mut slot = self.lock();
        let outcome = slot.connected()?.connect(from, to)?;
        info!(
            target: MANAGER_TARGET,
            from,
            to,
            already_connected = outcome.already_connected(),
            "connected ports"
        );
        Ok(outcome)
    }

    /// Removes the edge `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::EngineUnavailable`] when not connected and
    /// [`ManagerError::EngineCallFailed`] when the edge could not be removed.
    pub fn disconnect(&self, from: &str, to: &str) -> Result<(), ManagerError> {
        let mut slot = self.lock();
        slot.connected()?.disconnect(from, to)?;
        info!(target: MANAGER_TARGET, from, to, "disconnected ports");
        Ok(())
    }

    /// Removes every edge, skipping those the engine refuses to remove.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::EngineUnavailable`] when not connected and
    /// [`ManagerError::EngineCallFailed`] when the edges cannot be listed.
    pub fn clear_all(&self) -> Result<usize, ManagerError> {
        let mut slot = self.lock();
        let removed = slot.connected()?.disconnect_all()?;
        info!(target: MANAGER_TARGET, removed, "cleared connections");
        Ok(removed)
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        if slot.handle.is_some() {
            debug!(target: MANAGER_TARGET, "closing JACK session on drop");
            slot.close(&*self.reporter);
        }
    }
}
