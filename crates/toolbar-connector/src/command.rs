//! Typed toolbar commands
//!
//! The toolbar sends each command as a flat JSON record: an `Operation`
//! name, the agent's `UserName`/`DeviceName`, and operation specific
//! attributes (`slot`, `MCT_MEDIA_ITEM_ID`, `BreakReasonCd`, ...).
//! [`ToolbarCommand::from_json`] turns that record into a [`ToolbarCommand`]
//! whose [`Operation`] variant carries exactly the attributes that operation
//! uses.
//!
//! An `Operation` name the connector does not know is not a decoding error:
//! it becomes [`Operation::Unrecognized`] and the dispatcher reports it as
//! unhandled.
//!
//! ```rust
//! use rvoip_toolbar_connector::{Operation, ToolbarCommand};
//!
//! let command = ToolbarCommand::from_json(
//!     r#"{"Operation":"HangUp","UserName":"alice","DeviceName":"d1","slot":1,"MCT_MEDIA_ITEM_ID":"1001"}"#,
//! ).unwrap();
//!
//! match &command.operation {
//!     Operation::HangUp(call) => assert_eq!(call.media_item_id.as_deref(), Some("1001")),
//!     other => panic!("unexpected operation {}", other.name()),
//! }
//!
//! let unknown = ToolbarCommand::from_json(r#"{"Operation":"Teleport"}"#).unwrap();
//! assert_eq!(unknown.operation, Operation::Unrecognized("Teleport".to_string()));
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ConnectorError, ConnectorResult};
use crate::event::AgentIdentity;
use crate::types::{InteractionType, SendType};

/// Every operation name the dispatcher understands
pub const OPERATION_NAMES: [&str; 23] = [
    "Login",
    "Logout",
    "MakeReady",
    "MakeNotReady",
    "GetConnectorCapability",
    "GetBreakReasons",
    "MakeCall",
    "HangUp",
    "OnHold",
    "OffHold",
    "Accept",
    "Ignore",
    "End",
    "SingleStepTransfer",
    "Consult",
    "Conference",
    "CompleteTransfer",
    "Cancel",
    "UpdateData",
    "ResendLastEvent",
    "SetFocalInteraction",
    "Send",
    "RequestTranscript",
];

/// A command issued by the toolbar
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolbarCommand {
    #[serde(rename = "UserName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "DeviceName", default)]
    pub device_name: Option<String>,
    #[serde(flatten)]
    pub operation: Operation,
}

/// Operation requested by a [`ToolbarCommand`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "Operation")]
pub enum Operation {
    /// Sign the agent in to the provider
    Login(LoginParams),
    /// Sign the agent out of the provider
    Logout,
    /// Make the agent available for distributed interactions
    MakeReady,
    /// Make the agent unavailable, with a break reason
    MakeNotReady(NotReadyParams),
    /// Request the command/state capability descriptor
    GetConnectorCapability,
    /// Request the list of break reasons
    GetBreakReasons,
    /// Place an outbound call
    MakeCall(MakeCallParams),
    /// Disconnect an active call
    HangUp(CallParams),
    /// Place an active call on hold
    OnHold(CallParams),
    /// Resume a held call
    OffHold(CallParams),
    /// Answer a delivered call
    Accept(CallParams),
    /// Ignore a delivered call
    Ignore(CallParams),
    /// Finish a call after wrap-up
    End(CallParams),
    /// Blind transfer of the active call
    SingleStepTransfer(TransferParams),
    /// Hold the active call and dial a consultation target
    Consult(TransferParams),
    /// Merge the consultation call with the held call
    Conference(CallParams),
    /// Second step of a two-step transfer, or leave a conference
    CompleteTransfer(TransferParams),
    /// Drop the consultation and return to the original call
    Cancel(CallParams),
    /// Update call data; reserved, no event
    UpdateData(UpdateDataParams),
    /// Ask the provider to resend its last events; not supported
    ResendLastEvent,
    /// The toolbar changed its focused interaction
    SetFocalInteraction(CallParams),
    /// Chat text or typing notification from the toolbar's chat client
    Send(SendParams),
    /// Request the full transcript of a chat
    RequestTranscript(TranscriptParams),
    /// Any operation name the connector does not know
    #[serde(skip)]
    Unrecognized(String),
}

impl Operation {
    /// The toolbar's name for this operation
    pub fn name(&self) -> &str {
        match self {
            Operation::Login(_) => "Login",
            Operation::Logout => "Logout",
            Operation::MakeReady => "MakeReady",
            Operation::MakeNotReady(_) => "MakeNotReady",
            Operation::GetConnectorCapability => "GetConnectorCapability",
            Operation::GetBreakReasons => "GetBreakReasons",
            Operation::MakeCall(_) => "MakeCall",
            Operation::HangUp(_) => "HangUp",
            Operation::OnHold(_) => "OnHold",
            Operation::OffHold(_) => "OffHold",
            Operation::Accept(_) => "Accept",
            Operation::Ignore(_) => "Ignore",
            Operation::End(_) => "End",
            Operation::SingleStepTransfer(_) => "SingleStepTransfer",
            Operation::Consult(_) => "Consult",
            Operation::Conference(_) => "Conference",
            Operation::CompleteTransfer(_) => "CompleteTransfer",
            Operation::Cancel(_) => "Cancel",
            Operation::UpdateData(_) => "UpdateData",
            Operation::ResendLastEvent => "ResendLastEvent",
            Operation::SetFocalInteraction(_) => "SetFocalInteraction",
            Operation::Send(_) => "Send",
            Operation::RequestTranscript(_) => "RequestTranscript",
            Operation::Unrecognized(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Operation::Unrecognized(_))
    }
}

/// Attributes of `Login`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginParams {
    /// Agent group at the provider
    #[serde(rename = "Company", default)]
    pub company: Option<String>,
    /// Agent connector parameter declared in the connector type configuration
    #[serde(rename = "agentExtension", default)]
    pub agent_extension: Option<String>,
}

/// Attributes of `MakeNotReady`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotReadyParams {
    /// One of the codes delivered in the `BreakReasons` event
    #[serde(rename = "BreakReasonCd", default, deserialize_with = "lenient_string")]
    pub break_reason_code: Option<String>,
}

/// Attributes of `MakeCall`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MakeCallParams {
    #[serde(default)]
    pub slot: Option<u32>,
    /// Temporary id the toolbar assigned to the call it is about to place
    #[serde(rename = "MCT_MEDIA_ITEM_ID", default, deserialize_with = "lenient_string")]
    pub temp_call_id: Option<String>,
    #[serde(rename = "MCT_PHONE_NUMBER", default, deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(rename = "MCT_DISPLAY_STRING", default)]
    pub display_string: Option<String>,
}

/// Attributes shared by commands acting on an existing interaction
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CallParams {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(rename = "MCT_MEDIA_ITEM_ID", default, deserialize_with = "lenient_string")]
    pub media_item_id: Option<String>,
    /// Overrides the interaction type reported back for this operation
    #[serde(rename = "MCT_INTERACTION_TYPE", default)]
    pub interaction_type: Option<InteractionType>,
}

impl CallParams {
    pub fn for_media_item(media_item_id: impl Into<String>) -> Self {
        Self {
            media_item_id: Some(media_item_id.into()),
            ..Default::default()
        }
    }
}

/// Attributes of transfer and consultation commands
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransferParams {
    #[serde(flatten)]
    pub call: CallParams,
    #[serde(rename = "TargetAgent", default)]
    pub target_agent: Option<String>,
    #[serde(rename = "TargetUserId", default, deserialize_with = "lenient_string")]
    pub target_user_id: Option<String>,
    #[serde(rename = "TargetExtension", default, deserialize_with = "lenient_string")]
    pub target_extension: Option<String>,
    #[serde(rename = "MCT_NOTE_TEXT", default)]
    pub note_text: Option<String>,
    #[serde(rename = "MCT_ORGANIZATION_ID", default, deserialize_with = "lenient_string")]
    pub organization_id: Option<String>,
    #[serde(rename = "MCT_CONTACT_ID", default, deserialize_with = "lenient_string")]
    pub contact_id: Option<String>,
    #[serde(rename = "MCT_DISPLAY_STRING", default)]
    pub display_string: Option<String>,
    #[serde(rename = "MCT_RELATIONSHIP_ID", default, deserialize_with = "lenient_string")]
    pub relationship_id: Option<String>,
}

/// Attributes of `UpdateData`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateDataParams {
    #[serde(rename = "MCT_CONTACT_NAME", default)]
    pub contact_name: Option<String>,
}

/// Attributes of the chat `Send` command
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SendParams {
    /// Chat the payload belongs to
    #[serde(rename = "MCT_MEDIA_ITEM_ID", default, deserialize_with = "lenient_string")]
    pub media_item_id: Option<String>,
    #[serde(rename = "SendType", default)]
    pub send_type: Option<SendType>,
    /// Message text or URL; empty for typing notifications
    #[serde(rename = "SendString", default)]
    pub send_string: Option<String>,
}

/// Attributes of `RequestTranscript`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TranscriptParams {
    #[serde(rename = "MCT_MEDIA_ITEM_ID", default, deserialize_with = "lenient_string")]
    pub media_item_id: Option<String>,
    #[serde(rename = "MCT_INTERACTION_TYPE", default)]
    pub interaction_type: Option<InteractionType>,
}

impl ToolbarCommand {
    /// Command with no agent attributes
    pub fn new(operation: Operation) -> Self {
        Self {
            user_name: None,
            device_name: None,
            operation,
        }
    }

    /// Set the agent the command is issued for
    pub fn with_agent(mut self, user_name: impl Into<String>, device_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self.device_name = Some(device_name.into());
        self
    }

    /// The agent attributes events for this command are reported with
    pub fn agent(&self) -> AgentIdentity {
        AgentIdentity::new(self.user_name.as_deref(), self.device_name.as_deref())
    }

    /// Decode a command from the toolbar's JSON text
    pub fn from_json(raw: &str) -> ConnectorResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ConnectorError::malformed(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Decode a command from an already parsed JSON record
    pub fn from_value(value: Value) -> ConnectorResult<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| ConnectorError::malformed("command must be a JSON object"))?;

        let operation = match record.get("Operation") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(ConnectorError::malformed(format!(
                    "Operation must be a string, got {}",
                    other
                )));
            }
            None => return Err(ConnectorError::malformed("missing Operation")),
        };

        if !OPERATION_NAMES.contains(&operation.as_str()) {
            return Ok(Self {
                user_name: text_field(record.get("UserName")),
                device_name: text_field(record.get("DeviceName")),
                operation: Operation::Unrecognized(operation),
            });
        }

        serde_json::from_value(value)
            .map_err(|e| ConnectorError::malformed(format!("{}: {}", operation, e)))
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

/// Accept identifiers sent either as strings or as bare numbers
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}
