//! Error types for the ManagerITM client
//!
//! Provides structured error handling with context for the different failure
//! scenarios a caller can observe.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Main error type for the ManagerITM client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP communication errors with the ManagerITM service
    #[error("Remote request error: {0}")]
    RemoteRequest(#[from] RemoteRequestError),

    /// Operation invoked on a handle in the wrong lifecycle state
    #[error("Precondition error: {0}")]
    Precondition(#[from] PreconditionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// HTTP communication error variants
#[derive(Debug, Error)]
pub enum RemoteRequestError {
    /// Server answered with a non-2xx status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    /// Request never produced a response
    #[error("Connection to {url} failed: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// Response body could not be decoded
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

/// Handle lifecycle error variants
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// No remote instance has been provisioned, or it was already torn down
    #[error("cannot {operation}: client has not been provisioned")]
    NotProvisioned { operation: &'static str },

    /// Identifier cannot be used as a URL path segment
    #[error("client identifier '{client_id}' cannot be addressed")]
    InvalidClientId { client_id: String },
}

/// Configuration error variants
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load configuration file
    #[error("Failed to load config from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Configuration parsing error
    #[error("Failed to parse config: {reason}")]
    ParseError { reason: String },
}

impl RemoteRequestError {
    /// HTTP status carried by a non-2xx response, if that is what failed
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteRequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ClientError {
    pub fn is_not_provisioned(&self) -> bool {
        matches!(
            self,
            ClientError::Precondition(PreconditionError::NotProvisioned { .. })
        )
    }

    /// Status code of the failed remote request, if any
    pub fn remote_status(&self) -> Option<StatusCode> {
        match self {
            ClientError::RemoteRequest(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
