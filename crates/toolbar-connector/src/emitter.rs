//! Event emitter
//!
//! Wraps toolbar events in an [`Envelope`] and hands them to the callback
//! registered during `logon`. Delivery is synchronous and fire-and-forget:
//! the emitter never waits for or inspects a reply.

use crate::channel::{CallbackMethods, ChannelMessage, Envelope, LoginAck};
use crate::config::{ConnectorConfig, MissingChannelPolicy};
use crate::error::{ConnectorError, ConnectorResult};
use crate::event::ToolbarEvent;

/// Delivers envelopes through the registered toolbar callback
#[derive(Debug, Default)]
pub struct EventEmitter {
    channel: Option<CallbackMethods>,
    policy: MissingChannelPolicy,
    delivered: u64,
}

impl EventEmitter {
    pub fn new(policy: MissingChannelPolicy) -> Self {
        Self {
            channel: None,
            policy,
            delivered: 0,
        }
    }

    /// Register the toolbar's callbacks, replacing any previous registration
    pub fn register(&mut self, callbacks: CallbackMethods) {
        if callbacks.on_message.is_none() {
            tracing::warn!("Toolbar registered callbacks without on_message; events cannot be delivered");
        }
        self.channel = Some(callbacks);
    }

    /// Drop the registered callbacks
    pub fn unregister(&mut self) -> Option<CallbackMethods> {
        self.channel.take()
    }

    /// Whether an `on_message` callback is registered
    pub fn has_channel(&self) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|callbacks| callbacks.on_message.is_some())
    }

    /// Number of envelopes delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Check that events for `operation` could be delivered, honouring the policy
    ///
    /// Called before any session mutation so a command that cannot report
    /// its events leaves the session untouched.
    pub fn ensure_channel(&self, operation: &str) -> ConnectorResult<()> {
        if self.has_channel() || self.policy == MissingChannelPolicy::Drop {
            Ok(())
        } else {
            Err(ConnectorError::no_active_channel(operation))
        }
    }

    /// Wrap `event` and deliver it
    pub fn emit(
        &mut self,
        config: &ConnectorConfig,
        event: ToolbarEvent,
        source_id: &str,
    ) -> ConnectorResult<()> {
        let name = event.name;
        let message = ChannelMessage::Event(Envelope::wrap(config, source_id, event));
        self.deliver(&message, name.as_str())
    }

    /// Send the handshake acknowledgment; bypasses the envelope
    pub fn acknowledge_login(&mut self) -> ConnectorResult<()> {
        self.deliver(&ChannelMessage::LoginAck(LoginAck::ok()), "login response")
    }

    fn deliver(&mut self, message: &ChannelMessage, what: &str) -> ConnectorResult<()> {
        let Some(channel) = self.channel.as_mut() else {
            return self.missing_channel(what);
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            match serde_json::to_string(message) {
                Ok(payload) => tracing::debug!("Delivering {}: {}", what, payload),
                Err(e) => tracing::debug!("Delivering {} (payload not serializable: {})", what, e),
            }
        }

        if channel.deliver(message) {
            self.delivered += 1;
            Ok(())
        } else {
            self.missing_channel(what)
        }
    }

    fn missing_channel(&self, what: &str) -> ConnectorResult<()> {
        match self.policy {
            MissingChannelPolicy::Fail => Err(ConnectorError::no_active_channel(what)),
            MissingChannelPolicy::Drop => {
                tracing::warn!("No active channel, dropping {}", what);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AgentIdentity, EventName};
    use std::sync::{Arc, Mutex};

    fn ready() -> ToolbarEvent {
        ToolbarEvent::new(EventName::AgentReady, &AgentIdentity::default())
    }

    #[test]
    fn emit_without_channel_fails_fast() {
        let config = ConnectorConfig::default();
        let mut emitter = EventEmitter::new(MissingChannelPolicy::Fail);

        assert!(emitter.ensure_channel("MakeReady").is_err());
        let err = emitter.emit(&config, ready(), "src").unwrap_err();
        assert!(matches!(err, ConnectorError::NoActiveChannel { .. }));
        assert_eq!(emitter.delivered(), 0);
    }

    #[test]
    fn drop_policy_discards_silently() {
        let config = ConnectorConfig::default();
        let mut emitter = EventEmitter::new(MissingChannelPolicy::Drop);

        assert!(emitter.ensure_channel("MakeReady").is_ok());
        assert!(emitter.emit(&config, ready(), "src").is_ok());
        assert_eq!(emitter.delivered(), 0);
    }

    #[test]
    fn registered_channel_receives_envelopes_in_order() {
        let config = ConnectorConfig::default();
        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = names.clone();

        let mut emitter = EventEmitter::new(MissingChannelPolicy::Fail);
        emitter.register(CallbackMethods::on_message(move |_, message| {
            let envelope = message.envelope().expect("event envelope");
            sink.lock().unwrap().push((envelope.source_id.clone(), envelope.data.name));
        }));

        emitter.emit(&config, ready(), "a").unwrap();
        emitter
            .emit(&config, ToolbarEvent::new(EventName::AgentBusy, &AgentIdentity::default()), "b")
            .unwrap();

        assert_eq!(
            *names.lock().unwrap(),
            vec![
                ("a".to_string(), EventName::AgentReady),
                ("b".to_string(), EventName::AgentBusy)
            ]
        );
        assert_eq!(emitter.delivered(), 2);

        emitter.unregister();
        assert!(!emitter.has_channel());
    }

    #[test]
    fn callbacks_without_on_message_count_as_no_channel() {
        let mut emitter = EventEmitter::new(MissingChannelPolicy::Fail);
        emitter.register(CallbackMethods::default().with_on_close(|_, _| {}));
        assert!(!emitter.has_channel());
        assert!(emitter.acknowledge_login().is_err());
    }
}
