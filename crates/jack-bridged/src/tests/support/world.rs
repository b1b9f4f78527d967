//! BDD test world: a bootstrapped bridge over a scripted engine, optionally
//! serving HTTP on a loopback listener.

use std::cell::RefCell;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;

use jack_bridge_config::ListenEndpoint;

use crate::bootstrap::{Bridge, BootstrapError, ConfigLoader, bootstrap_with};
use crate::dispatch::BridgeConnectionHandler;
use crate::manager::{ConnectionManager, ConnectionState};
use crate::transport::{ListenerHandle, SocketListener};

use super::client::{exchange, response_json};
use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::engine::ScriptedEngine;
use super::reporter::RecordingHealthReporter;

/// Scenario world shared across BDD steps.
pub struct BridgeWorld {
    loader: Box<dyn ConfigLoader>,
    pub engine: ScriptedEngine,
    pub reporter: Arc<RecordingHealthReporter>,
    bridge: Option<Bridge>,
    bootstrap_error: Option<BootstrapError>,
    server: Option<(SocketAddr, ListenerHandle)>,
    last_response: Option<String>,
}

impl BridgeWorld {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new()),
            engine: ScriptedEngine::with_system_ports(),
            reporter: Arc::new(RecordingHealthReporter::default()),
            bridge: None,
            bootstrap_error: None,
            server: None,
            last_response: None,
        }
    }

    pub fn use_failing_loader(&mut self) {
        self.loader = Box::new(FailingConfigLoader);
    }

    /// Runs the bootstrap sequence once.
    pub fn bootstrap(&mut self) {
        if self.bridge.is_some() || self.bootstrap_error.is_some() {
            return;
        }
        match bootstrap_with(&*self.loader, self.reporter.clone(), self.engine.clone()) {
            Ok(bridge) => self.bridge = Some(bridge),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    #[must_use]
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    fn bridge(&self) -> &Bridge {
        self.bridge.as_ref().expect("bridge was bootstrapped")
    }

    #[must_use]
    pub fn manager(&self) -> Arc<ConnectionManager> {
        self.bridge().manager()
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.manager().state()
    }

    /// Attempts the first engine session.
    pub fn initialize(&self) -> bool {
        self.manager().initialize()
    }

    /// Runs a single watchdog cycle.
    pub fn tick_watchdog(&self) -> bool {
        self.bridge().watchdog().tick()
    }

    /// Starts serving HTTP on an ephemeral loopback port.
    pub fn serve(&mut self) {
        if self.server.is_some() {
            return;
        }
        let listener = SocketListener::bind(&ListenEndpoint::new("127.0.0.1", 0))
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let handler = Arc::new(BridgeConnectionHandler::new(self.manager()));
        let handle = listener.start(handler, 4).expect("start listener");
        self.server = Some((addr, handle));
    }

    /// Sends a raw request to the running listener and keeps the response.
    pub fn send(&mut self, request: &str) {
        self.serve();
        let (addr, _) = self.server.as_ref().expect("listener running");
        self.last_response = Some(exchange(*addr, request));
    }

    #[must_use]
    pub fn last_response(&self) -> &str {
        self.last_response.as_deref().expect("a request was sent")
    }

    #[must_use]
    pub fn last_body(&self) -> Value {
        response_json(self.last_response())
    }
}

impl Default for BridgeWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BridgeWorld {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.server.take() {
            handle.shutdown();
            drop(handle.join());
        }
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<BridgeWorld> {
    RefCell::new(BridgeWorld::new())
}
