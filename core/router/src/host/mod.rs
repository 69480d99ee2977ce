//! Process host for the session event router.
//!
//! A front-end starts the host as a child process and talks to it over a
//! framed JSON protocol on stdio. Lifecycle events arrive as requests; while
//! handling one, the host calls back into the front-end with reverse requests
//! for every session or editor operation the router issues.
//!
//! This is not a Neovim remote plugin. Neovim speaks msgpack-rpc, so using
//! the host from Neovim needs an adapter that translates to these frames.
//!
//! # Architecture
//!
//! - [`transport`]: `Content-Length` framing over any byte stream
//! - [`messages`]: typed request arguments and reverse calls
//! - [`remote`]: the session and editor traits implemented over the channel
//! - [`server`]: the request loop dispatching to the router

pub mod messages;
pub mod remote;
pub mod server;
pub mod transport;

pub use remote::{Channel, RemoteEditor, RemoteSession, RemoteSessionFactory};
pub use server::HostServer;
pub use transport::{StdioTransport, StreamTransport, Transport};

use serde::{Deserialize, Serialize};

/// Protocol message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProtocolMessage {
    #[allow(missing_docs)]
    #[serde(rename = "request")]
    Request(Request),
    #[allow(missing_docs)]
    #[serde(rename = "response")]
    Response(Response),
}

/// Request message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[allow(missing_docs)]
    pub seq: i64,
    #[allow(missing_docs)]
    pub command: String,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<serde_json::Value>,
}

/// Response message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[allow(missing_docs)]
    pub seq: i64,
    #[allow(missing_docs)]
    pub request_seq: i64,
    #[allow(missing_docs)]
    pub success: bool,
    #[allow(missing_docs)]
    pub command: String,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl ProtocolMessage {
    /// Sequence number of the message.
    pub fn seq(&self) -> i64 {
        match self {
            Self::Request(r) => r.seq,
            Self::Response(r) => r.seq,
        }
    }
}

#[cfg(test)]
mod tests;
