//! Error types for the chat widget.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while asking the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The backend answered with a non-success status. The body is not read.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The request never produced a response (unreachable host, reset, timeout).
    #[error("{0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RequestError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RequestError::Status(status.as_u16())
        } else {
            RequestError::Transport(err.to_string())
        }
    }
}

/// Errors that occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Math rendering error: {0}")]
    Math(String),

    #[error("Highlighting error: {0}")]
    Highlight(String),
}

/// Errors raised by a clipboard capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable")]
    Unavailable,

    #[error("Clipboard write rejected: {0}")]
    Rejected(String),

    #[error("Copy command failed: {0}")]
    CopyCommand(String),

    #[error("No code block at index {0}")]
    NoSuchBlock(usize),

    #[error("No transcript entry at index {0}")]
    NoSuchEntry(usize),
}

/// Errors that occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
