//! Unified error types for the probe service.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Unified error type for the probe service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// In-flight requests did not drain before the grace period elapsed.
    #[error("graceful shutdown did not complete within {grace:?}")]
    ShutdownTimeout {
        /// The grace period that elapsed.
        grace: Duration,
    },

    /// The serving task stopped unexpectedly.
    #[error("listener failed: {0}")]
    Listener(String),

    /// Metrics recorder installation error.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a request body fails to bind into a typed payload.
#[derive(Error, Debug)]
pub enum BindError {
    /// The body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// The body is not valid JSON.
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// A required field is absent or null.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// A required string field is empty.
    #[error("required field `{field}` must not be empty")]
    EmptyField {
        /// Field name.
        field: &'static str,
    },

    /// A field has the wrong JSON type.
    #[error("field `{field}` must be a {expected}, found {found}")]
    WrongType {
        /// Field name.
        field: &'static str,
        /// Expected JSON kind.
        expected: &'static str,
        /// JSON kind that was found.
        found: &'static str,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
