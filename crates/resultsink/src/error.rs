//! Reporting errors

use thiserror::Error;

/// Errors surfaced by result composition and reporting
///
/// A missing sink configuration is never one of these: the client degrades to
/// a no-op instead.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Malformed input to composition; nothing was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to report test result: {0}")]
    Transport(#[from] TransportError),

    /// The client's HTTP session has been released
    #[error("ResultSink client is closed")]
    Closed,

    #[error("Failed to serialize test result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from the HTTP session
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Sink responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP session already released")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SinkError>;
