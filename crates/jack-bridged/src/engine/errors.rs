//! Errors reported by engine backends and handles.

use std::io;

use thiserror::Error;

/// Failures surfaced while talking to the audio-routing engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine server could not be reached.
    #[error("JACK server is not reachable: {message}")]
    NotRunning {
        /// Diagnostic describing why the server was considered absent.
        message: String,
    },
    /// A JACK tool could not be started.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        /// Name of the tool.
        tool: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// A JACK tool exceeded the configured time budget and was killed.
    #[error("{tool} timed out after {timeout_ms} ms")]
    Timeout {
        /// Name of the tool.
        tool: String,
        /// Budget that was exceeded.
        timeout_ms: u128,
    },
    /// A JACK tool exited unsuccessfully.
    #[error("{tool} exited with status {status}: {stderr}")]
    ToolFailed {
        /// Name of the tool.
        tool: String,
        /// Exit status, or `-1` when terminated by a signal.
        status: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// A JACK tool produced output that could not be interpreted.
    #[error("unexpected output from {tool}: {message}")]
    InvalidOutput {
        /// Name of the tool.
        tool: String,
        /// Description of the problem.
        message: String,
    },
    /// The engine refused the requested operation.
    #[error("engine rejected the request: {message}")]
    Rejected {
        /// Reason reported by the engine.
        message: String,
    },
}

impl EngineError {
    /// Creates a not-running error.
    pub fn not_running(message: impl Into<String>) -> Self {
        Self::NotRunning {
            message: message.into(),
        }
    }

    /// Creates a rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates an invalid-output error.
    pub fn invalid_output(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
