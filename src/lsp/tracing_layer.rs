//! Tracing layer that forwards events to LSP window/logMessage.

use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;
use lsp_server::{Connection, Message, Notification};
use lsp_types::notification::{LogMessage, Notification as _};
use lsp_types::{LogMessageParams, MessageType};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::Layer;

type SharedSender = Arc<Mutex<Option<Sender<Message>>>>;

/// A tracing layer that sends log messages to the LSP client.
///
/// Messages are dropped until the handle attaches a connection, which
/// happens after the handshake and only when the client asked for it.
pub struct LspLayer {
    sender: SharedSender,
}

/// Handle to attach the layer to a connection once the client is ready.
#[derive(Clone)]
pub struct LspLayerHandle {
    sender: SharedSender,
}

impl LspLayerHandle {
    pub fn attach(&self, connection: &Connection) {
        if let Ok(mut sender) = self.sender.lock() {
            *sender = Some(connection.sender.clone());
        }
    }

    /// Release the sender so the connection's writer thread can finish.
    pub fn detach(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            *sender = None;
        }
    }
}

impl LspLayer {
    pub fn new() -> (Self, LspLayerHandle) {
        let sender = SharedSender::default();

        let layer = Self {
            sender: Arc::clone(&sender),
        };

        (layer, LspLayerHandle { sender })
    }

    fn level_to_message_type(level: &Level) -> MessageType {
        match *level {
            Level::ERROR => MessageType::ERROR,
            Level::WARN => MessageType::WARNING,
            Level::INFO => MessageType::INFO,
            Level::DEBUG | Level::TRACE => MessageType::LOG,
        }
    }
}

/// Collects the `message` field and renders the others as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }
}

impl<S: Subscriber> Layer<S> for LspLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Ok(sender) = self.sender.lock() else {
            return;
        };
        let Some(sender) = sender.as_ref() else {
            return;
        };

        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut message = if visitor.message.is_empty() {
            metadata.target().to_string()
        } else {
            visitor.message
        };
        if !visitor.fields.is_empty() {
            message.push(' ');
            message.push_str(&visitor.fields.join(" "));
        }

        let params = LogMessageParams {
            typ: Self::level_to_message_type(metadata.level()),
            message,
        };
        let notif = Notification::new(LogMessage::METHOD.to_string(), params);
        // The client may already be gone; logging must not fail the server.
        let _ = sender.send(Message::Notification(notif));
    }

    fn enabled(
        &self,
        _metadata: &Metadata<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) -> bool {
        true
    }
}
