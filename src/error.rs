//! Error types for the chat server
//!
//! Defines the domain validation error, application-level errors and
//! client send errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Rejection of a submitted chat message
///
/// Recoverable: reported to the originating connection only, and the
/// store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Message text is empty after trimming
    #[error("message text is empty")]
    EmptyText,
}

/// Application-level errors
///
/// Covers fatal transport errors (connection termination) and
/// domain errors surfaced to a client.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - hub has shut down)
    #[error("Channel send error")]
    ChannelSend,

    /// Hub dropped a reply before answering
    #[error("Hub unavailable")]
    HubUnavailable,

    /// Submitted message failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
