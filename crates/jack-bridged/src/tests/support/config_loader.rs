//! Configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::net::TcpListener;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};

use jack_bridge_config::{Config, ListenEndpoint};

use crate::bootstrap::ConfigLoader;

/// Finds a loopback port that is free right now.
pub fn reserve_port() -> u16 {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind probe listener");
    listener.local_addr().expect("probe listener address").port()
}

/// Loader that listens on loopback with quiet logging and a fast watchdog.
#[derive(Debug, Clone)]
pub struct TestConfigLoader {
    port: u16,
}

impl TestConfigLoader {
    /// Listens on an ephemeral port chosen by the kernel.
    #[must_use]
    pub fn new() -> Self {
        Self::on_port(0)
    }

    #[must_use]
    pub fn on_port(port: u16) -> Self {
        Self { port }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen: ListenEndpoint::new("127.0.0.1", self.port),
            watchdog_interval_secs: 1,
            watchdog_poll_ms: 10,
            log_filter: String::from("warn"),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an invalid listen address.
#[derive(Debug, Clone, Copy)]
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("jack-bridged"),
            OsString::from("--listen"),
            OsString::from("unix:///tmp/bridge.sock"),
        ];
        Config::load_from_iter(args)
    }
}
