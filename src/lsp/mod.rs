//! Language Server Protocol host for the ABNF language services.
//!
//! Supports go to definition, find references, document symbols, hover,
//! rename and completion over full-text document sync.

mod config;
mod error;
mod pretty;
mod server;
mod tracing_layer;

pub use server::serve;
pub use tracing_layer::{LspLayer, LspLayerHandle};
