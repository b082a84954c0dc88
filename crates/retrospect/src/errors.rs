//! Shared error types and utilities for the retrospect project.

#[cfg(not(target_arch = "wasm32"))]
pub use color_eyre::Report;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("Failed to install color_eyre")]
    ColorEyre(#[from] color_eyre::Report),
    #[error("Failed to install tracing-subscriber")]
    TracingSubscriber(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure raised by a store handler group while observing an action.
///
/// A failing group is logged and skipped; sibling groups still observe the
/// action and the store keeps serving dispatches.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Analytics backend rejected event: {0}")]
    Analytics(String),
    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Failure on the live-session channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Malformed session payload: {0}")]
    BadPayload(#[from] serde_json::Error),
    #[error("Channel closed")]
    Closed,
}
