//! Errors that end the language server.

use crossbeam_channel::{RecvError, SendError};
use derive_more::{Display, Error, From};
use lsp_server::{Message, ProtocolError};

/// Transport-level failures. Query misses are never errors.
#[derive(Debug, Display, Error, From)]
pub enum ServerError {
    #[display("Protocol error: {_0}")]
    Protocol(ProtocolError),
    #[display("Failed to send message: {_0}")]
    Send(SendError<Message>),
    #[display("Failed to receive message: {_0}")]
    Recv(RecvError),
    #[display("Invalid JSON: {_0}")]
    Json(serde_json::Error),
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}
