//! Exact `(method, path)` routing onto connection manager operations.

use std::sync::Arc;

use tracing::debug;

use crate::manager::{ConnectionManager, ManagerError};

use super::DISPATCH_TARGET;
use super::bodies::{ClearBody, ConnectionsBody, EdgeBody, HealthBody, PortsBody, StatusBody};
use super::errors::DispatchError;
use super::fields::PortPair;
use super::request::HttpRequest;
use super::response::HttpResponse;

/// Operations reachable over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Preflight,
    Health,
    Status,
    Ports,
    Connections,
    Connect,
    Disconnect,
    Clear,
    NotFound,
}

impl Route {
    pub(crate) fn resolve(method: &str, path: &str) -> Self {
        match (method, path) {
            ("OPTIONS", _) => Self::Preflight,
            ("GET", "/health") => Self::Health,
            ("GET", "/status") => Self::Status,
            ("GET", "/ports") => Self::Ports,
            ("GET", "/connections") => Self::Connections,
            ("POST", "/connect") => Self::Connect,
            ("POST", "/disconnect") => Self::Disconnect,
            ("POST", "/clear") => Self::Clear,
            _ => Self::NotFound,
        }
    }
}

/// Serves parsed requests against the shared manager.
#[derive(Debug)]
pub(crate) struct Router {
    manager: Arc<ConnectionManager>,
}

impl Router {
    pub(crate) fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    /// Produces the response for `request`. Never fails: errors become
    /// error bodies.
    pub(crate) fn route(&self, request: &HttpRequest) -> HttpResponse {
        let route = Route::resolve(request.method(), request.path());
        debug!(
            target: DISPATCH_TARGET,
            method = request.method(),
            path = request.path(),
            ?route,
            "routing request"
        );
        let result = match route {
            Route::Preflight => Ok(HttpResponse::empty()),
            Route::Health => self.health(),
            Route::Status => self.status(),
            Route::Ports => self.ports(),
            Route::Connections => self.connections(),
            Route::Connect => self.connect(request),
            Route::Disconnect => self.disconnect(request),
            Route::Clear => self.clear(),
            Route::NotFound => Err(DispatchError::NotFound {
                path: request.path().to_owned(),
            }),
        };
        result.unwrap_or_else(|error| {
            debug!(target: DISPATCH_TARGET, %error, "request failed");
            HttpResponse::error(&error)
        })
    }

    fn method(&self) -> &'static str {
        self.manager.method()
    }

    fn require_engine(&self) -> Result<(), DispatchError> {
        if self.manager.probe() {
            Ok(())
        } else {
            Err(DispatchError::EngineUnavailable)
        }
    }

    fn health(&self) -> Result<HttpResponse, DispatchError> {
        let status = self.manager.status();
        HttpResponse::json(&HealthBody::new(&status, self.method()))
    }

    fn status(&self) -> Result<HttpResponse, DispatchError> {
        let status = self.manager.status();
        HttpResponse::json(&StatusBody::new(status, self.method()))
    }

    fn ports(&self) -> Result<HttpResponse, DispatchError> {
        self.require_engine()?;
        let ports = self.manager.list_ports()?;
        HttpResponse::json(&PortsBody::new(ports, self.method()))
    }

    fn connections(&self) -> Result<HttpResponse, DispatchError> {
        self.require_engine()?;
        let connections = self.manager.list_connections()?;
        HttpResponse::json(&ConnectionsBody::new(connections, self.method()))
    }

    fn connect(&self, request: &HttpRequest) -> Result<HttpResponse, DispatchError> {
        let pair = PortPair::from_body(request.body())?;
        self.require_engine()?;
        let body = match self.manager.connect(&pair.source, &pair.destination) {
            Ok(outcome) => EdgeBody::connected(outcome, self.method()),
            Err(error) => self.edge_failure(error)?,
        };
        HttpResponse::json(&body)
    }

    fn disconnect(&self, request: &HttpRequest) -> Result<HttpResponse, DispatchError> {
        let pair = PortPair::from_body(request.body())?;
        self.require_engine()?;
        let body = match self.manager.disconnect(&pair.source, &pair.destination) {
            Ok(()) => EdgeBody::disconnected(self.method()),
            Err(error) => self.edge_failure(error)?,
        };
        HttpResponse::json(&body)
    }

    /// Engine rejections are answered with a `Failed` edge body; a vanished
    /// session is answered like every other unavailable-engine case.
    fn edge_failure(&self, error: ManagerError) -> Result<EdgeBody, DispatchError> {
        match DispatchError::from(error) {
            DispatchError::EngineUnavailable => Err(DispatchError::EngineUnavailable),
            error => Ok(EdgeBody::failed(&error, self.method())),
        }
    }

    fn clear(&self) -> Result<HttpResponse, DispatchError> {
        self.require_engine()?;
        let count = self.manager.clear_all()?;
        HttpResponse::json(&ClearBody::new(count, self.method()))
    }
}
