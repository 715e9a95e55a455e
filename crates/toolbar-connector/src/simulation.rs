//! Provider-initiated activity
//!
//! A real provider pushes events to the toolbar on its own: a customer
//! calls in, a chat message arrives, the consulted party hangs up. The
//! [`Simulator`] produces those events for a connector without going
//! through the command dispatcher, using the same emitter and channel.
//!
//! ```rust
//! use rvoip_toolbar_connector::{CallbackMethods, ConnectorConfig, ToolbarConnector};
//! use std::sync::{Arc, Mutex};
//!
//! let received = Arc::new(Mutex::new(Vec::new()));
//! let sink = received.clone();
//!
//! let mut connector = ToolbarConnector::new(ConnectorConfig::default());
//! connector.logon("https://provider.example.com", "alice", "pw", CallbackMethods::on_message(
//!     move |_, message| sink.lock().unwrap().push(message.clone()),
//! )).unwrap();
//!
//! let call_id = connector.simulate().inbound_call("15552224444", "18885551234", "John Smith").unwrap();
//!
//! // login acknowledgment + AgentBusy, Delivered, Established
//! assert_eq!(received.lock().unwrap().len(), 4);
//! assert!(!call_id.is_empty());
//! ```

use crate::connector::ToolbarConnector;
use crate::error::{ConnectorError, ConnectorResult};
use crate::event::{AgentIdentity, EventName, ToolbarEvent};
use crate::types::{Direction, InteractionType, MediaType, SendType};

/// Optional routing overrides for a provider-initiated event
///
/// Unset fields fall back to the configured source id, the agent that
/// logged on and the configured simulated device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOrigin {
    pub source_id: Option<String>,
    pub user_name: Option<String>,
    pub device_name: Option<String>,
}

/// Attributes of a provider-initiated interaction event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionParams {
    pub interaction_type: Option<InteractionType>,
    pub media_type: Option<MediaType>,
    pub origin: EventOrigin,
}

/// Attributes of a provider-initiated `Delivered` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredParams {
    pub call_id: String,
    pub direction: Option<Direction>,
    pub interaction_type: Option<InteractionType>,
    pub media_type: Option<MediaType>,
    pub display_string: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub origin: EventOrigin,
}

impl DeliveredParams {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            direction: None,
            interaction_type: None,
            media_type: None,
            display_string: None,
            phone_number: None,
            email: None,
            origin: EventOrigin::default(),
        }
    }
}

/// Emits provider-initiated events through a connector's channel
pub struct Simulator<'a> {
    connector: &'a mut ToolbarConnector,
}

impl<'a> Simulator<'a> {
    pub(crate) fn new(connector: &'a mut ToolbarConnector) -> Self {
        Self { connector }
    }

    /// A customer call arrives and is connected to the agent
    ///
    /// Emits AgentBusy, Delivered and Established; returns the new call id.
    pub fn inbound_call(&mut self, ani: &str, dnis: &str, display_string: &str) -> ConnectorResult<String> {
        tracing::info!("Simulating inbound call from {} to {}", ani, dnis);
        self.new_phone_call(ani, dnis, display_string, Direction::Inbound, InteractionType::InboundCall)
    }

    /// The agent dialled from an external device (not click-to-call)
    pub fn outbound_call(&mut self, ani: &str, dnis: &str, display_string: &str) -> ConnectorResult<String> {
        tracing::info!("Simulating outbound call from {} to {}", ani, dnis);
        self.new_phone_call(ani, dnis, display_string, Direction::Outbound, InteractionType::OutboundCall)
    }

    /// A customer starts a chat; it becomes the active chat for [`inbound_message`](Self::inbound_message)
    pub fn inbound_chat(&mut self, email: &str, display_string: &str) -> ConnectorResult<String> {
        tracing::info!("Simulating inbound chat from {}", email);
        self.connector.emitter.ensure_channel("inbound chat")?;

        let chat_id = self.connector.ids.next_id();
        let agent = self.agent(&EventOrigin::default());

        let busy = ToolbarEvent::new(EventName::AgentBusy, &agent);
        let delivered = ToolbarEvent::new(EventName::Delivered, &agent)
            .with_media_item(chat_id.clone())
            .with_display_string(Some(display_string))
            .with_email(Some(email))
            .with_interaction(InteractionType::InboundChat, MediaType::Chat)
            .with_direction(Direction::Inbound);
        let established = ToolbarEvent::new(EventName::Established, &agent)
            .with_media_item(chat_id.clone())
            .with_interaction(InteractionType::InboundChat, MediaType::Chat);

        self.connector.active_chat = Some(chat_id.clone());
        self.emit_all([busy, delivered, established], None)?;
        Ok(chat_id)
    }

    /// The customer types and sends `message` on the active chat
    ///
    /// Emits UserTyping, UserTypingStopped and NewMessage.
    pub fn inbound_message(&mut self, message: &str) -> ConnectorResult<()> {
        let chat_id = self.connector.active_chat.clone().ok_or(ConnectorError::NoActiveChat)?;
        tracing::info!("Simulating chat message on {}", chat_id);
        self.connector.emitter.ensure_channel("inbound message")?;

        let agent = self.agent(&EventOrigin::default());
        let chat_event = |name| {
            ToolbarEvent::new(name, &agent)
                .with_media_item(chat_id.clone())
                .with_interaction(InteractionType::InboundChat, MediaType::Chat)
        };

        let typing = chat_event(EventName::UserTyping);
        let stopped = chat_event(EventName::UserTypingStopped);
        let new_message = chat_event(EventName::NewMessage).with_chat_payload(SendType::Chat, message);

        self.emit_all([typing, stopped, new_message], None)
    }

    /// The third party of a consultation or conference hung up
    ///
    /// The agent is back on the original call. Returns whether an
    /// OffConference event was emitted; nothing happens outside a conference.
    pub fn consultation_hangup(&mut self, call_id: &str, origin: &EventOrigin) -> ConnectorResult<bool> {
        if !self.connector.session.in_conference {
            tracing::debug!("Consultation hangup for {} outside a conference, ignoring", call_id);
            return Ok(false);
        }

        tracing::info!("Simulating consultation hangup on {}", call_id);
        self.connector.emitter.ensure_channel("consultation hangup")?;
        self.connector.session.in_conference = false;

        let event = ToolbarEvent::new(EventName::OffConference, &self.agent(origin)).with_media_item(call_id);
        self.emit_all([event], origin.source_id.as_deref())?;
        Ok(true)
    }

    /// The provider delivered a new interaction
    pub fn delivered(&mut self, params: &DeliveredParams) -> ConnectorResult<()> {
        tracing::info!("Simulating Delivered for {}", params.call_id);
        let mut event = ToolbarEvent::new(EventName::Delivered, &self.agent(&params.origin))
            .with_media_item(params.call_id.clone())
            .with_interaction(
                params.interaction_type.unwrap_or(InteractionType::InboundCall),
                params.media_type.unwrap_or(MediaType::Phone),
            )
            .with_direction(params.direction.unwrap_or(Direction::Inbound))
            .with_display_string(params.display_string.as_deref())
            .with_phone_number(params.phone_number.as_deref());
        event.email = params.email.clone();

        self.emit_all([event], params.origin.source_id.as_deref())
    }

    /// The provider connected the interaction
    pub fn established(&mut self, call_id: &str, params: &InteractionParams) -> ConnectorResult<()> {
        self.single(EventName::Established, call_id, params, InteractionType::InboundCall)
    }

    /// The provider released the interaction
    pub fn hang_up(&mut self, call_id: &str, params: &InteractionParams) -> ConnectorResult<()> {
        self.single(EventName::Released, call_id, params, InteractionType::InboundCall)
    }

    /// The provider placed the interaction on hold
    pub fn hold(&mut self, call_id: &str, params: &InteractionParams) -> ConnectorResult<()> {
        self.single(EventName::OnHold, call_id, params, InteractionType::InboundCall)
    }

    /// The provider placed the interaction into consultation
    pub fn consult(&mut self, call_id: &str, params: &InteractionParams) -> ConnectorResult<()> {
        self.single(EventName::OnConsultation, call_id, params, InteractionType::ConsultationCall)
    }

    fn single(
        &mut self,
        name: EventName,
        call_id: &str,
        params: &InteractionParams,
        default_type: InteractionType,
    ) -> ConnectorResult<()> {
        tracing::info!("Simulating {} for {}", name, call_id);
        let event = ToolbarEvent::new(name, &self.agent(&params.origin))
            .with_media_item(call_id)
            .with_interaction(
                params.interaction_type.unwrap_or(default_type),
                params.media_type.unwrap_or(MediaType::Phone),
            );
        self.emit_all([event], params.origin.source_id.as_deref())
    }

    fn new_phone_call(
        &mut self,
        ani: &str,
        dnis: &str,
        display_string: &str,
        direction: Direction,
        interaction_type: InteractionType,
    ) -> ConnectorResult<String> {
        self.connector.emitter.ensure_channel("new call")?;

        let call_id = self.connector.ids.next_id();
        let agent = self.agent(&EventOrigin::default());

        let busy = ToolbarEvent::new(EventName::AgentBusy, &agent);
        let delivered = ToolbarEvent::new(EventName::Delivered, &agent)
            .with_media_item(call_id.clone())
            .with_party(Some(ani), Some(dnis), Some(display_string), Some(ani))
            .with_interaction(interaction_type, MediaType::Phone)
            .with_direction(direction);
        let established = ToolbarEvent::new(EventName::Established, &agent)
            .with_media_item(call_id.clone())
            .with_interaction(interaction_type, MediaType::Phone);

        self.emit_all([busy, delivered, established], None)?;
        Ok(call_id)
    }

    fn agent(&self, origin: &EventOrigin) -> AgentIdentity {
        AgentIdentity {
            user_name: origin.user_name.clone().or_else(|| self.connector.agent_user.clone()),
            device_name: Some(
                origin
                    .device_name
                    .clone()
                    .unwrap_or_else(|| self.connector.config.simulated_device_name.clone()),
            ),
        }
    }

    fn emit_all<const N: usize>(&mut self, events: [ToolbarEvent; N], source_id: Option<&str>) -> ConnectorResult<()> {
        for event in events {
            self.connector.send_toolbar_event(event, source_id)?;
        }
        Ok(())
    }
}
