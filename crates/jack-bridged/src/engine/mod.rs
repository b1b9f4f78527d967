//! Capability seam over the audio-routing engine.
//!
//! The bridge never talks to JACK directly. A [`EngineBackend`] opens
//! sessions, and each session is an [`EngineHandle`] exposing the handful of
//! calls the connection manager needs. Backends are free to implement these
//! against the native client library, the command-line tools, or a scripted
//! double in tests.

mod errors;
mod lsp;
mod runner;
mod tools;

use serde::Serialize;
use tracing::debug;

pub use self::errors::EngineError;
pub use self::tools::{JackTools, JackToolsBackend};

pub(crate) const ENGINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::engine");

/// Direction of an engine port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    /// Port receives signal.
    Input,
    /// Port produces signal.
    Output,
}

/// Signal carried by an engine port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// 32-bit float audio.
    Audio,
    /// Raw MIDI events.
    Midi,
}

/// Port registered with the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Fully qualified name in `client:port` form.
    pub name: String,
    /// Signal direction.
    pub direction: PortDirection,
    /// Signal kind.
    pub kind: PortKind,
}

impl Port {
    /// Builds a port description.
    pub fn new(name: impl Into<String>, direction: PortDirection, kind: PortKind) -> Self {
        Self {
            name: name.into(),
            direction,
            kind,
        }
    }
}

/// Directed edge from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Connection {
    /// Output port name.
    pub from: String,
    /// Input port name.
    pub to: String,
}

impl Connection {
    /// Builds an edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns whether this edge joins the given ports.
    #[must_use]
    pub fn joins(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }
}

/// Engine parameters captured by a successful probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    /// Frames per second.
    pub sample_rate: u32,
    /// Frames per period.
    pub buffer_size: u32,
    /// Name the bridge registered under.
    pub client_name: String,
}

/// Result of a connect request that the engine accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new edge was created.
    Connected,
    /// The edge already existed; nothing changed.
    AlreadyConnected,
}

impl ConnectOutcome {
    /// Returns `true` when the edge pre-dated the request.
    #[must_use]
    pub const fn already_connected(self) -> bool {
        matches!(self, Self::AlreadyConnected)
    }
}

/// Opens sessions against the engine.
pub trait EngineBackend: Send + Sync {
    /// Opens a new session. Fails when the engine is not reachable.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when no session could be established.
    fn open(&self) -> Result<Box<dyn EngineHandle>, EngineError>;

    /// Label reported to clients describing how the engine is driven.
    fn method(&self) -> &'static str;
}

/// An open session with the engine.
///
/// Handles are not required to be thread-safe; the connection manager
/// serialises every call.
pub trait EngineHandle: Send {
    /// Checks that the engine still answers and reports its parameters.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine no longer responds.
    fn probe(&mut self) -> Result<EngineInfo, EngineError>;

    /// Lists every registered port.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine call fails.
    fn ports(&mut self) -> Result<Vec<Port>, EngineError>;

    /// Lists every edge, each reported once from its output side.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine call fails.
    fn connections(&mut self) -> Result<Vec<Connection>, EngineError>;

    /// Creates an edge.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine refuses the edge.
    fn connect(&mut self, from: &str, to: &str) -> Result<ConnectOutcome, EngineError>;

    /// Removes an edge.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the edge could not be removed.
    fn disconnect(&mut self, from: &str, to: &str) -> Result<(), EngineError>;

    /// Removes every edge and reports how many were removed.
    ///
    /// Individual failures are skipped; only a failure to enumerate the
    /// edges aborts the sweep.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the edges cannot be enumerated.
    fn disconnect_all(&mut self) -> Result<usize, EngineError> {
        let edges = self.connections()?;
        let mut removed = 0;
        for edge in &edges {
            match self.disconnect(&edge.from, &edge.to) {
                Ok(()) => removed += 1,
                Err(error) => debug!(
                    target: ENGINE_TARGET,
                    from = %edge.from,
                    to = %edge.to,
                    error = %error,
                    "skipping edge that could not be removed"
                ),
            }
        }
        Ok(removed)
    }

    /// Releases the session. Further calls on the handle are undefined.
    fn close(&mut self);
}
