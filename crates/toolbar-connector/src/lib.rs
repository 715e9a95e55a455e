//! # Toolbar Connector - Reference Contact Center Connector
//!
//! This crate implements the connector side of a contact center toolbar
//! integration: the toolbar framework sends commands (log in, make a call,
//! hold, transfer, conference, chat) and the connector answers with the
//! agent and interaction events a telephony/chat provider would produce.
//! There is no real provider behind it; every command succeeds the way the
//! provider's happy path would.
//!
//! ## Quick Start
//!
//! ```rust
//! use rvoip_toolbar_connector::{CallbackMethods, ConnectorConfig, EventName, ToolbarConnector};
//! use std::sync::{Arc, Mutex};
//!
//! let events = Arc::new(Mutex::new(Vec::new()));
//! let sink = events.clone();
//!
//! let mut connector = ToolbarConnector::new(ConnectorConfig::default());
//! connector.logon("https://provider.example.com", "alice", "pw", CallbackMethods::on_message(
//!     move |_, message| {
//!         if let Some(event) = message.event() {
//!             sink.lock().unwrap().push(event.name);
//!         }
//!     },
//! ))?;
//!
//! let handled = connector.send_toolbar_command_json(
//!     r#"{"Operation":"Login","UserName":"alice","DeviceName":"d1"}"#,
//! )?;
//!
//! assert!(handled);
//! assert!(connector.is_logged_in());
//! assert_eq!(*events.lock().unwrap(), vec![EventName::AgentLoggedOn, EventName::AgentReady]);
//! # Ok::<(), rvoip_toolbar_connector::ConnectorError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! toolbar --command--> dispatcher --transition--> session
//!                                       |
//!                                       +--events--> emitter --envelope--> on_message
//!
//! simulator (provider-initiated) -----------------> emitter
//! ```
//!
//! - [`dispatcher`]: the command → event table
//! - [`session`]: connected / logged in / in conference flags
//! - [`emitter`] and [`channel`]: envelopes and the registered callbacks
//! - [`simulation`]: inbound calls, chats and hangups from the provider side
//! - [`config`]: every payload the connector reports that no command supplies

pub mod channel;
pub mod chat;
pub mod command;
pub mod config;
pub mod connector;
pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod event;
pub mod ids;
pub mod provider;
pub mod session;
pub mod simulation;
pub mod types;

// Re-export main types
pub use channel::{CallbackMethods, ChannelData, ChannelMessage, Envelope, LoginAck, ToolbarCallback};
pub use chat::{ChatTransport, LoggingChatTransport};
pub use command::{
    CallParams, LoginParams, MakeCallParams, NotReadyParams, Operation, SendParams, ToolbarCommand,
    TranscriptParams, TransferParams, UpdateDataParams, OPERATION_NAMES,
};
pub use config::{ConnectorConfig, MissingChannelPolicy, TranscriptConfig, CONFIG_ENV_VAR};
pub use connector::ToolbarConnector;
pub use dispatcher::{Dispatch, OutboundChat, Transition};
pub use error::{ConnectorError, ConnectorResult};
pub use event::{AgentIdentity, EventName, ToolbarEvent, RESERVED_ATTRIBUTES};
pub use provider::{ServerLauncher, SimulatedProvider};
pub use session::{Session, SessionPhase, SessionUpdate};
pub use simulation::{DeliveredParams, EventOrigin, InteractionParams, Simulator};
pub use types::{ContentType, Direction, InteractionType, MediaType, MessageType, SendType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
