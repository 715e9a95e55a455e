//! Connector configuration
//!
//! Payloads the connector reports without a command supplying them (envelope
//! routing, capability descriptor, break reasons, transcript text) come
//! from a [`ConnectorConfig`]. Configurations are
//! YAML documents in which every key is optional; see
//! `config/connector.example.yaml` for the full set of keys and their
//! built-in values.
//!
//! Resolution order for [`ConnectorConfig::load`]:
//!
//! 1. an explicit path (errors are returned to the caller)
//! 2. the file named by `TOOLBAR_CONNECTOR_CONFIG` (falls back to the
//!    built-in configuration with a warning if it cannot be used)
//! 3. the built-in configuration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{ConnectorError, ConnectorResult};
use crate::event::RESERVED_ATTRIBUTES;
use crate::types::ContentType;

/// Environment variable naming an override configuration file
pub const CONFIG_ENV_VAR: &str = "TOOLBAR_CONNECTOR_CONFIG";

const DEFAULT_CAPABILITY: &str = include_str!("../config/connector_capability.json");

const DEFAULT_TRANSCRIPT: &str = "[Me] Hello\n[You] Hi\n[Me] See ya\n[You] Goodbye";

/// What the emitter does with an event when no channel is registered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingChannelPolicy {
    /// Return [`ConnectorError::NoActiveChannel`] before touching the session
    #[default]
    Fail,
    /// Drop the event with a warning and carry on
    Drop,
}

/// Content of the `Transcript` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub content_type: ContentType,
    pub text: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::Text,
            text: DEFAULT_TRANSCRIPT.to_string(),
        }
    }
}

/// Connector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// `sender` of every envelope
    pub sender: String,
    /// `type` of every envelope
    pub envelope_type: String,
    /// `name` of every envelope
    pub envelope_name: String,
    /// Origin identifier established during the handshake
    pub source_id: String,
    /// Reported as `UseFusionChat` on `AgentLoggedOn`
    pub use_native_chat: bool,
    /// DNIS reported on outbound calls
    pub outbound_dnis: String,
    /// Device name on provider-initiated events
    pub simulated_device_name: String,
    /// Break reason label → code, in the order the toolbar lists them
    pub break_reasons: IndexMap<String, String>,
    /// Capability descriptor sent with `AgentConnectorCapability`
    pub capability: Value,
    pub transcript: TranscriptConfig,
    pub missing_channel: MissingChannelPolicy,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            sender: "ToolbarGateway".to_string(),
            envelope_type: "toolbarResponse".to_string(),
            envelope_name: "toolbarEventName".to_string(),
            source_id: "exampleSourceId".to_string(),
            use_native_chat: true,
            outbound_dnis: "+1 888 555 1234".to_string(),
            simulated_device_name: "myDevice".to_string(),
            break_reasons: default_break_reasons(),
            capability: default_capability(),
            transcript: TranscriptConfig::default(),
            missing_channel: MissingChannelPolicy::Fail,
        }
    }
}

fn default_break_reasons() -> IndexMap<String, String> {
    [
        ("On Break", "6001"),
        ("Morning Coffee Break", "6002"),
        ("Lunch Break", "6003"),
        ("Afternoon Tea Break", "6004"),
        ("Break Dancing", "6005"),
    ]
    .into_iter()
    .map(|(label, code)| (label.to_string(), code.to_string()))
    .collect()
}

fn default_capability() -> Value {
    serde_json::from_str(DEFAULT_CAPABILITY)
        .expect("Embedded connector capability descriptor must be valid JSON")
}

impl ConnectorConfig {
    /// Parse a YAML document; omitted keys keep their built-in values
    pub fn from_yaml_str(yaml: &str) -> ConnectorResult<Self> {
        let config: ConnectorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConnectorResult<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Resolve the configuration: explicit path, then environment, then built-in
    pub fn load(path: Option<&Path>) -> ConnectorResult<Self> {
        if let Some(path) = path {
            tracing::info!("Loading connector configuration from: {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(custom_path) = std::env::var(CONFIG_ENV_VAR) {
            tracing::info!("Loading connector configuration from {}: {}", CONFIG_ENV_VAR, custom_path);
            match Self::from_file(&custom_path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!(
                        "Failed to load connector configuration from {} ({}), falling back to built-in",
                        custom_path,
                        e
                    );
                }
            }
        }

        tracing::debug!("Using built-in connector configuration");
        Ok(Self::default())
    }

    /// Check the values the protocol cannot do without
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.sender.trim().is_empty() {
            return Err(ConnectorError::config("sender must not be empty"));
        }
        if self.source_id.trim().is_empty() {
            return Err(ConnectorError::config("source_id must not be empty"));
        }
        if !self.capability.is_object() {
            return Err(ConnectorError::config("capability must be a JSON object"));
        }
        if let Some((label, _)) = self.break_reasons.iter().find(|(_, code)| code.trim().is_empty()) {
            return Err(ConnectorError::config(format!(
                "break reason '{}' has an empty code",
                label
            )));
        }
        if let Some(label) = self
            .break_reasons
            .keys()
            .find(|label| RESERVED_ATTRIBUTES.contains(&label.as_str()))
        {
            return Err(ConnectorError::config(format!(
                "break reason label '{}' collides with an event attribute",
                label
            )));
        }
        Ok(())
    }

    /// Capability descriptor encoded the way the toolbar expects it
    pub fn capability_string(&self) -> ConnectorResult<String> {
        Ok(serde_json::to_string(&self.capability)?)
    }
}
