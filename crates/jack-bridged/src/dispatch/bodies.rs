//! JSON bodies returned by each route.

use serde::Serialize;

use crate::engine::{ConnectOutcome, Connection, EngineInfo, Port};
use crate::manager::EngineStatus;

use super::errors::DispatchError;
use super::response::timestamp;

const SERVICE: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub(crate) struct HealthBody {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    jack_running: bool,
    state: &'static str,
    method: &'static str,
    timestamp: String,
}

impl HealthBody {
    pub(crate) fn new(status: &EngineStatus, method: &'static str) -> Self {
        let running = status.running();
        Self {
            status: if running { "healthy" } else { "unhealthy" },
            service: SERVICE,
            version: VERSION,
            jack_running: running,
            state: status.state.as_str(),
            method,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusBody {
    success: bool,
    jack_running: bool,
    state: &'static str,
    method: &'static str,
    #[serde(flatten)]
    info: Option<EngineInfo>,
    timestamp: String,
}

impl StatusBody {
    pub(crate) fn new(status: EngineStatus, method: &'static str) -> Self {
        Self {
            success: true,
            jack_running: status.running(),
            state: status.state.as_str(),
            method,
            info: status.info,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PortsBody {
    success: bool,
    ports: Vec<String>,
    count: usize,
    method: &'static str,
    timestamp: String,
}

impl PortsBody {
    pub(crate) fn new(ports: Vec<Port>, method: &'static str) -> Self {
        let ports: Vec<String> = ports.into_iter().map(|port| port.name).collect();
        Self {
            success: true,
            count: ports.len(),
            ports,
            method,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ConnectionsBody {
    success: bool,
    connections: Vec<Connection>,
    count: usize,
    method: &'static str,
    timestamp: String,
}

impl ConnectionsBody {
    pub(crate) fn new(connections: Vec<Connection>, method: &'static str) -> Self {
        Self {
            success: true,
            count: connections.len(),
            connections,
            method,
            timestamp: timestamp(),
        }
    }
}

/// Body for `/connect` and `/disconnect`.
#[derive(Debug, Serialize)]
pub(crate) struct EdgeBody {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    already_connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    method: &'static str,
    timestamp: String,
}

impl EdgeBody {
    pub(crate) fn connected(outcome: ConnectOutcome, method: &'static str) -> Self {
        Self {
            success: true,
            message: "Connected",
            already_connected: Some(outcome.already_connected()),
            error: None,
            method,
            timestamp: timestamp(),
        }
    }

    pub(crate) fn disconnected(method: &'static str) -> Self {
        Self {
            success: true,
            message: "Disconnected",
            already_connected: None,
            error: None,
            method,
            timestamp: timestamp(),
        }
    }

    pub(crate) fn failed(error: &DispatchError, method: &'static str) -> Self {
        Self {
            success: false,
            message: "Failed",
            already_connected: None,
            error: Some(error.to_string()),
            method,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ClearBody {
    success: bool,
    message: &'static str,
    count: usize,
    method: &'static str,
    timestamp: String,
}

impl ClearBody {
    pub(crate) fn new(count: usize, method: &'static str) -> Self {
        Self {
            success: true,
            message: "Cleared all connections",
            count,
            method,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    timestamp: String,
}

impl ErrorBody {
    pub(crate) fn from_error(error: &DispatchError) -> Self {
        let path = match error {
            DispatchError::NotFound { path } => Some(path.clone()),
            _ => None,
        };
        Self {
            success: false,
            error: error.to_string(),
            path,
            timestamp: timestamp(),
        }
    }
}
