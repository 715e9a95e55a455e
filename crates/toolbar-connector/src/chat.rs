//! Outbound chat transport
//!
//! The toolbar's chat client sends messages and typing notifications with
//! the `Send` command. Delivering them to the customer is the provider's
//! job; the connector forwards each payload to a [`ChatTransport`].

use crate::dispatcher::OutboundChat;
use crate::error::ConnectorResult;

/// Provider side of the agent's chat messages
pub trait ChatTransport: Send {
    fn send(&mut self, chat: &OutboundChat) -> ConnectorResult<()>;
}

/// Transport that only records the payload in the log
#[derive(Debug, Default)]
pub struct LoggingChatTransport;

impl ChatTransport for LoggingChatTransport {
    fn send(&mut self, chat: &OutboundChat) -> ConnectorResult<()> {
        tracing::info!(
            "Chat {:?}: {:?} {:?}",
            chat.chat_id,
            chat.send_type,
            chat.payload
        );
        Ok(())
    }
}
