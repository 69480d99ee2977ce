//! Error type shared by the router, the session traits and the host.

use std::io;

/// Result type for router and session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the session or the editor.
///
/// The router never recovers from these; they travel back to whoever
/// delivered the event.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport to the editor failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// A message could not be encoded or decoded.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// The editor answered a reverse request with a failure.
    #[error("`{command}` failed: {message}")]
    Remote {
        /// Wire name of the failed call.
        command: String,
        /// Failure reported by the editor.
        message: String,
    },

    /// The message exchange broke the request/response discipline.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The editor went away while a response was awaited.
    #[error("editor disconnected")]
    Disconnected,

    /// A lifecycle request arrived before the session was started.
    #[error("no active session")]
    NoSession,

    /// A second session was requested.
    #[error("session already started")]
    AlreadyStarted,

    /// A request carried arguments that do not match its command.
    #[error("invalid arguments for `{command}`: {source}")]
    InvalidArguments {
        /// Command whose arguments were rejected.
        command: String,
        /// Decoding failure.
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
