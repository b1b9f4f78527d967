//! Error types for request dispatch failures.

use thiserror::Error;

use crate::engine::EngineError;
use crate::manager::ManagerError;

/// Errors surfaced while serving a request.
///
/// Every variant is rendered into the response body; the `Display` text is
/// the client-facing `error` message.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No connected engine session.
    #[error("JACK not running")]
    EngineUnavailable,
    /// The engine rejected the call.
    #[error("{source}")]
    EngineCallFailed {
        /// Engine failure.
        #[source]
        source: EngineError,
    },
    /// A POST request arrived without a body.
    #[error("No request body")]
    MissingBody,
    /// The body lacks a required string field.
    #[error("Missing source or destination")]
    MissingField,
    /// No route matches the method and path.
    #[error("Not found")]
    NotFound {
        /// Requested path.
        path: String,
    },
    /// A response body could not be serialised.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ManagerError> for DispatchError {
    fn from(error: ManagerError) -> Self {
        match error {
            ManagerError::EngineUnavailable => Self::EngineUnavailable,
            ManagerError::EngineCallFailed { source } => Self::EngineCallFailed { source },
        }
    }
}
