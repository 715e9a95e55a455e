//! Shared vocabulary of the toolbar protocol
//!
//! These enums serialize to the exact strings the toolbar framework
//! exchanges in `MCT_*` attributes and chat fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a toolbar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Agent state change (logon, ready, busy, ...)
    AgentEvent,
    /// Change of an individual interaction (call or chat)
    InteractionEvent,
}

/// Kind of interaction, sent as `MCT_INTERACTION_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionType {
    InboundCall,
    OutboundCall,
    PreviewCall,
    WebCallback,
    ConsultationCall,
    InboundChat,
}

/// Media of an interaction, sent as `MCT_MEDIA_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Phone,
    Chat,
}

/// Direction of a delivered interaction, sent as `MCT_DIRECTION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "INBOUND")]
    Inbound,
    #[serde(rename = "OUTBOUND")]
    Outbound,
}

/// Payload kind of a chat `Send` command or `NewMessage` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SendType {
    Chat,
    #[serde(rename = "URL")]
    Url,
    TypingStarted,
    TypingStopped,
}

/// Format of a transcript body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "URL")]
    Url,
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InteractionType::InboundCall => "InboundCall",
            InteractionType::OutboundCall => "OutboundCall",
            InteractionType::PreviewCall => "PreviewCall",
            InteractionType::WebCallback => "WebCallback",
            InteractionType::ConsultationCall => "ConsultationCall",
            InteractionType::InboundChat => "InboundChat",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Phone => write!(f, "Phone"),
            MediaType::Chat => write!(f, "Chat"),
        }
    }
}
