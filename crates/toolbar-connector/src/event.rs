//! Toolbar events
//!
//! A [`ToolbarEvent`] is the state-change notification the connector sends
//! to the toolbar. On the wire it is a flat record keyed by the toolbar's
//! attribute names (`EventName`, `MessageType`, `UserName`, `MCT_*`, ...);
//! attributes that do not apply to an event are omitted entirely.
//!
//! Events are built with [`ToolbarEvent::new`] and the `with_*` methods:
//!
//! ```rust
//! use rvoip_toolbar_connector::{AgentIdentity, EventName, InteractionType, MediaType, ToolbarEvent};
//!
//! let agent = AgentIdentity::new(Some("alice"), Some("d1"));
//! let event = ToolbarEvent::new(EventName::OnHold, &agent)
//!     .with_media_item("1429542011000")
//!     .with_interaction(InteractionType::InboundCall, MediaType::Phone);
//!
//! let wire = serde_json::to_value(&event).unwrap();
//! assert_eq!(wire["EventName"], "OnHold");
//! assert_eq!(wire["MessageType"], "InteractionEvent");
//! assert_eq!(wire["MCT_MEDIA_ITEM_ID"], "1429542011000");
//! assert!(wire.get("MCT_DIRECTION").is_none());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ContentType, Direction, InteractionType, MediaType, MessageType, SendType};

/// Name of a toolbar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    // Agent events
    AgentLoggedOn,
    AgentLoggedOut,
    AgentReady,
    AgentNotReady,
    AgentBusy,
    AgentConnectorCapability,
    BreakReasons,

    // Interaction events
    Delivered,
    Established,
    Released,
    OnHold,
    End,
    OnConsultation,
    OnConference,
    OffConference,
    FocusInteraction,
    Transcript,
    UserTyping,
    UserTypingStopped,
    NewMessage,
}

impl EventName {
    /// The `MessageType` tag every event of this name carries
    pub fn message_type(&self) -> MessageType {
        match self {
            EventName::AgentLoggedOn
            | EventName::AgentLoggedOut
            | EventName::AgentReady
            | EventName::AgentNotReady
            | EventName::AgentBusy
            | EventName::AgentConnectorCapability
            | EventName::BreakReasons => MessageType::AgentEvent,
            _ => MessageType::InteractionEvent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::AgentLoggedOn => "AgentLoggedOn",
            EventName::AgentLoggedOut => "AgentLoggedOut",
            EventName::AgentReady => "AgentReady",
            EventName::AgentNotReady => "AgentNotReady",
            EventName::AgentBusy => "AgentBusy",
            EventName::AgentConnectorCapability => "AgentConnectorCapability",
            EventName::BreakReasons => "BreakReasons",
            EventName::Delivered => "Delivered",
            EventName::Established => "Established",
            EventName::Released => "Released",
            EventName::OnHold => "OnHold",
            EventName::End => "End",
            EventName::OnConsultation => "OnConsultation",
            EventName::OnConference => "OnConference",
            EventName::OffConference => "OffConference",
            EventName::FocusInteraction => "FocusInteraction",
            EventName::Transcript => "Transcript",
            EventName::UserTyping => "UserTyping",
            EventName::UserTypingStopped => "UserTypingStopped",
            EventName::NewMessage => "NewMessage",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The agent an event is reported for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentIdentity {
    pub user_name: Option<String>,
    pub device_name: Option<String>,
}

impl AgentIdentity {
    pub fn new(user_name: Option<&str>, device_name: Option<&str>) -> Self {
        Self {
            user_name: user_name.map(str::to_owned),
            device_name: device_name.map(str::to_owned),
        }
    }
}

/// Wire names of the fixed `ToolbarEvent` attributes
///
/// Break reason labels share the event record with these and must not reuse them.
pub const RESERVED_ATTRIBUTES: [&str; 22] = [
    "EventName",
    "MessageType",
    "UserName",
    "DeviceName",
    "slot",
    "TempCallId",
    "MCT_MEDIA_ITEM_ID",
    "MCT_ANI",
    "MCT_DNIS",
    "MCT_DISPLAY_STRING",
    "MCT_PHONE_NUMBER",
    "MCT_EMAIL",
    "MCT_INTERACTION_TYPE",
    "MCT_DIRECTION",
    "MCT_MEDIA_TYPE",
    "BreakReasonCd",
    "ConnectorCapability",
    "UseFusionChat",
    "ContentType",
    "Text",
    "SendType",
    "SendString",
];

/// A state-change notification for the toolbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarEvent {
    #[serde(rename = "EventName")]
    pub name: EventName,
    #[serde(rename = "MessageType")]
    pub message_type: MessageType,
    #[serde(rename = "UserName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "DeviceName", default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,

    /// Toolbar slot the interaction occupies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u32>,
    /// Id the toolbar assigned before the provider allocated one
    #[serde(rename = "TempCallId", default, skip_serializing_if = "Option::is_none")]
    pub temp_call_id: Option<String>,
    #[serde(rename = "MCT_MEDIA_ITEM_ID", default, skip_serializing_if = "Option::is_none")]
    pub media_item_id: Option<String>,
    #[serde(rename = "MCT_ANI", default, skip_serializing_if = "Option::is_none")]
    pub ani: Option<String>,
    #[serde(rename = "MCT_DNIS", default, skip_serializing_if = "Option::is_none")]
    pub dnis: Option<String>,
    #[serde(rename = "MCT_DISPLAY_STRING", default, skip_serializing_if = "Option::is_none")]
    pub display_string: Option<String>,
    #[serde(rename = "MCT_PHONE_NUMBER", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "MCT_EMAIL", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "MCT_INTERACTION_TYPE", default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<InteractionType>,
    #[serde(rename = "MCT_DIRECTION", default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(rename = "MCT_MEDIA_TYPE", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,

    #[serde(rename = "BreakReasonCd", default, skip_serializing_if = "Option::is_none")]
    pub break_reason_code: Option<String>,
    /// Capability descriptor, carried as a JSON encoded string
    #[serde(rename = "ConnectorCapability", default, skip_serializing_if = "Option::is_none")]
    pub connector_capability: Option<String>,
    /// Whether the toolbar's built-in chat client should be used
    #[serde(rename = "UseFusionChat", default, skip_serializing_if = "Option::is_none")]
    pub use_native_chat: Option<bool>,

    #[serde(rename = "ContentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(rename = "Text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "SendType", default, skip_serializing_if = "Option::is_none")]
    pub send_type: Option<SendType>,
    #[serde(rename = "SendString", default, skip_serializing_if = "Option::is_none")]
    pub send_string: Option<String>,

    /// Break reason label → code pairs, flattened into the event record
    #[serde(flatten)]
    pub break_reasons: IndexMap<String, String>,
}

impl ToolbarEvent {
    /// Create an event for `agent` with no interaction attributes
    pub fn new(name: EventName, agent: &AgentIdentity) -> Self {
        Self {
            name,
            message_type: name.message_type(),
            user_name: agent.user_name.clone(),
            device_name: agent.device_name.clone(),
            slot: None,
            temp_call_id: None,
            media_item_id: None,
            ani: None,
            dnis: None,
            display_string: None,
            phone_number: None,
            email: None,
            interaction_type: None,
            direction: None,
            media_type: None,
            break_reason_code: None,
            connector_capability: None,
            use_native_chat: None,
            content_type: None,
            text: None,
            send_type: None,
            send_string: None,
            break_reasons: IndexMap::new(),
        }
    }

    pub fn with_slot(mut self, slot: Option<u32>) -> Self {
        self.slot = slot;
        self
    }

    pub fn with_media_item(mut self, media_item_id: impl Into<String>) -> Self {
        self.media_item_id = Some(media_item_id.into());
        self
    }

    /// Set the media item id when one is known
    pub fn with_optional_media_item(mut self, media_item_id: Option<&str>) -> Self {
        self.media_item_id = media_item_id.map(str::to_owned);
        self
    }

    pub fn with_temp_call_id(mut self, temp_call_id: Option<&str>) -> Self {
        self.temp_call_id = temp_call_id.map(str::to_owned);
        self
    }

    pub fn with_interaction(mut self, interaction_type: InteractionType, media_type: MediaType) -> Self {
        self.interaction_type = Some(interaction_type);
        self.media_type = Some(media_type);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Caller details shown on a delivered interaction
    pub fn with_party(
        mut self,
        ani: Option<&str>,
        dnis: Option<&str>,
        display_string: Option<&str>,
        phone_number: Option<&str>,
    ) -> Self {
        self.ani = ani.map(str::to_owned);
        self.dnis = dnis.map(str::to_owned);
        self.display_string = display_string.map(str::to_owned);
        self.phone_number = phone_number.map(str::to_owned);
        self
    }

    pub fn with_display_string(mut self, display_string: Option<&str>) -> Self {
        self.display_string = display_string.map(str::to_owned);
        self
    }

    pub fn with_phone_number(mut self, phone_number: Option<&str>) -> Self {
        self.phone_number = phone_number.map(str::to_owned);
        self
    }

    pub fn with_email(mut self, email: Option<&str>) -> Self {
        self.email = email.map(str::to_owned);
        self
    }

    pub fn with_break_reason_code(mut self, code: Option<&str>) -> Self {
        self.break_reason_code = code.map(str::to_owned);
        self
    }

    pub fn with_connector_capability(mut self, capability: String) -> Self {
        self.connector_capability = Some(capability);
        self
    }

    pub fn with_native_chat(mut self, use_native_chat: bool) -> Self {
        self.use_native_chat = Some(use_native_chat);
        self
    }

    pub fn with_break_reasons(mut self, reasons: &IndexMap<String, String>) -> Self {
        self.break_reasons = reasons.clone();
        self
    }

    pub fn with_transcript(mut self, content_type: ContentType, text: impl Into<String>) -> Self {
        self.content_type = Some(content_type);
        self.text = Some(text.into());
        self
    }

    pub fn with_chat_payload(mut self, send_type: SendType, send_string: impl Into<String>) -> Self {
        self.send_type = Some(send_type);
        self.send_string = Some(send_string.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn message_type_follows_event_name() {
        assert_eq!(EventName::AgentReady.message_type(), MessageType::AgentEvent);
        assert_eq!(EventName::BreakReasons.message_type(), MessageType::AgentEvent);
        assert_eq!(EventName::Delivered.message_type(), MessageType::InteractionEvent);
        assert_eq!(EventName::NewMessage.message_type(), MessageType::InteractionEvent);
    }

    #[test]
    fn agent_event_wire_shape_omits_absent_attributes() {
        let agent = AgentIdentity::new(Some("alice"), Some("d1"));
        let event = ToolbarEvent::new(EventName::AgentLoggedOn, &agent).with_native_chat(true);

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "EventName": "AgentLoggedOn",
                "MessageType": "AgentEvent",
                "UserName": "alice",
                "DeviceName": "d1",
                "UseFusionChat": true
            })
        );
    }

    #[test]
    fn break_reasons_are_flattened_in_order() {
        let mut reasons = IndexMap::new();
        reasons.insert("On Break".to_string(), "6001".to_string());
        reasons.insert("Lunch Break".to_string(), "6003".to_string());

        let agent = AgentIdentity::new(Some("alice"), None);
        let event = ToolbarEvent::new(EventName::BreakReasons, &agent).with_break_reasons(&reasons);
        let wire = serde_json::to_value(&event).unwrap();

        assert_eq!(wire["On Break"], "6001");
        assert_eq!(wire["Lunch Break"], "6003");
        assert!(wire.get("DeviceName").is_none());

        let text = serde_json::to_string(&event).unwrap();
        assert!(text.find("On Break").unwrap() < text.find("Lunch Break").unwrap());
    }

    #[test]
    fn reserved_attributes_cover_every_wire_field() {
        let agent = AgentIdentity::new(Some("alice"), Some("d1"));
        let event = ToolbarEvent::new(EventName::Delivered, &agent)
            .with_slot(Some(1))
            .with_temp_call_id(Some("t"))
            .with_media_item("42")
            .with_party(Some("a"), Some("d"), Some("n"), Some("p"))
            .with_email(Some("e"))
            .with_interaction(InteractionType::InboundChat, MediaType::Chat)
            .with_direction(Direction::Inbound)
            .with_break_reason_code(Some("6001"))
            .with_connector_capability("{}".to_string())
            .with_native_chat(true)
            .with_transcript(ContentType::Text, "t")
            .with_chat_payload(SendType::Chat, "s");

        let wire = serde_json::to_value(&event).unwrap();
        let mut keys: Vec<&str> = wire.as_object().unwrap().keys().map(String::as_str).collect();
        let mut reserved = RESERVED_ATTRIBUTES.to_vec();
        keys.sort_unstable();
        reserved.sort_unstable();
        assert_eq!(keys, reserved);
    }

    #[test]
    fn delivered_event_parses_back() {
        let agent = AgentIdentity::new(None, Some("myDevice"));
        let event = ToolbarEvent::new(EventName::Delivered, &agent)
            .with_media_item("42")
            .with_party(Some("15552224444"), Some("18885551234"), Some("John Smith"), Some("15552224444"))
            .with_interaction(InteractionType::InboundCall, MediaType::Phone)
            .with_direction(Direction::Inbound);

        let wire = serde_json::to_string(&event).unwrap();
        let parsed: ToolbarEvent = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, event);
    }
}
