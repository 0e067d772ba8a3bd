//! Error types for the social.gal client.
//!
//! # Design
//! Every HTTP status >= 400 lands in `RequestFailed` with the server's raw
//! response text; no status is singled out. Callers that want to branch on
//! "not found" vs "unauthorized" can inspect `ApiError::status`.

use thiserror::Error;

/// Errors returned by `Session` and the entity action methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request was attempted before `Session::open` or after `Session::close`.
    #[error("session is not open")]
    NotOpen,

    /// `Session::open` was called while a connection was already live.
    #[error("session is already open")]
    AlreadyOpen,

    /// The server answered with a status >= 400. `body` is the raw response text.
    #[error("{body}")]
    RequestFailed { status: u16, body: String },

    /// The response body did not match the expected JSON shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The underlying HTTP client failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The token or session string cannot be carried in an HTTP header.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Reading a file attachment from disk failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of a `RequestFailed`, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
