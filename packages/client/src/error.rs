//! Error types for the Todo Manager client.

use std::time::Duration;

use thiserror::Error;

/// Main error type for the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The verb is not one the client knows how to send.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("Invalid JSON in response body: {0}")]
    Json(#[from] serde_json::Error),

    /// A field the caller relied on was absent from a response entity.
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// The service never answered the readiness probe.
    #[error("Service at {base_url} not ready after {attempts} attempts ({interval:?} apart)")]
    NotReady {
        base_url: String,
        attempts: u32,
        interval: Duration,
    },

    /// The service kept answering after a shutdown request.
    #[error("Service at {base_url} still responding after {attempts} attempts")]
    StillRunning { base_url: String, attempts: u32 },

    /// Restart needs a server jar to launch.
    #[error("No server jar configured; set TODO_MANAGER_JAR to enable restarts")]
    JarNotConfigured,

    /// IO error (spawning or stopping the server process).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
