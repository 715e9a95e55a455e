//! Delivery channel between the connector and the toolbar
//!
//! The toolbar registers its callbacks once, during `logon`. From then on
//! every message reaches it as a pair: a [`ChannelData`] placeholder and a
//! [`ChannelMessage`], which is either the one-off [`LoginAck`] of the
//! handshake or an [`Envelope`] wrapping a toolbar event.
//!
//! [`CallbackMethods`] keeps the three slots (`on_open`, `on_message`,
//! `on_close`) toolbars pass in, but only `on_message` is invoked: the
//! handshake acknowledgment, events and everything else go through it and
//! the toolbar tells them apart by content. The other two slots are
//! accepted for compatibility and never called.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConnectorConfig;
use crate::event::ToolbarEvent;

/// Routing wrapper around one toolbar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub sender: String,
    #[serde(rename = "type")]
    pub envelope_type: String,
    pub name: String,
    #[serde(rename = "sourceId")]
    pub source_id: String,
    pub data: ToolbarEvent,
}

impl Envelope {
    /// Wrap `event` with the routing metadata from `config`
    pub fn wrap(config: &ConnectorConfig, source_id: &str, event: ToolbarEvent) -> Self {
        Self {
            sender: config.sender.clone(),
            envelope_type: config.envelope_type.clone(),
            name: config.envelope_name.clone(),
            source_id: source_id.to_string(),
            data: event,
        }
    }
}

/// Handshake acknowledgment sent once by `logon`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAck {
    #[serde(rename = "reqType")]
    pub req_type: String,
    #[serde(rename = "type")]
    pub ack_type: String,
    pub msg: String,
    pub data: String,
}

impl LoginAck {
    pub fn ok() -> Self {
        Self {
            req_type: "login".to_string(),
            ack_type: "response".to_string(),
            msg: "ok".to_string(),
            data: "login response ok".to_string(),
        }
    }
}

/// Second argument of every callback invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelMessage {
    Event(Envelope),
    LoginAck(LoginAck),
}

impl ChannelMessage {
    /// The wrapped toolbar event, if this message carries one
    pub fn event(&self) -> Option<&ToolbarEvent> {
        match self {
            ChannelMessage::Event(envelope) => Some(&envelope.data),
            ChannelMessage::LoginAck(_) => None,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            ChannelMessage::Event(envelope) => Some(envelope),
            ChannelMessage::LoginAck(_) => None,
        }
    }

    pub fn login_ack(&self) -> Option<&LoginAck> {
        match self {
            ChannelMessage::LoginAck(ack) => Some(ack),
            ChannelMessage::Event(_) => None,
        }
    }
}

/// First argument of every callback invocation; always `{"data": null}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelData {
    pub data: Option<serde_json::Value>,
}

/// A toolbar callback
pub type ToolbarCallback = Box<dyn FnMut(&ChannelData, &ChannelMessage) + Send>;

/// Callbacks registered by the toolbar during `logon`
#[derive(Default)]
pub struct CallbackMethods {
    /// Accepted but never invoked
    pub on_open: Option<ToolbarCallback>,
    /// Receives every message
    pub on_message: Option<ToolbarCallback>,
    /// Accepted but never invoked
    pub on_close: Option<ToolbarCallback>,
}

impl CallbackMethods {
    /// Only an `on_message` callback, the common case
    pub fn on_message<F>(callback: F) -> Self
    where
        F: FnMut(&ChannelData, &ChannelMessage) + Send + 'static,
    {
        Self {
            on_message: Some(Box::new(callback)),
            ..Default::default()
        }
    }

    pub fn with_on_open<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ChannelData, &ChannelMessage) + Send + 'static,
    {
        self.on_open = Some(Box::new(callback));
        self
    }

    pub fn with_on_close<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ChannelData, &ChannelMessage) + Send + 'static,
    {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Deliver `message` through `on_message`; returns false if that slot is empty
    pub(crate) fn deliver(&mut self, message: &ChannelMessage) -> bool {
        match self.on_message.as_mut() {
            Some(callback) => {
                callback(&ChannelData::default(), message);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for CallbackMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackMethods")
            .field("on_open", &self.on_open.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}
