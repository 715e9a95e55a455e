//! The toolbar connector handle
//!
//! [`ToolbarConnector`] is what the toolbar framework talks to. It owns the
//! session flags, the registered channel and the configuration, and runs
//! every command to completion before returning.
//!
//! Lifecycle:
//!
//! ```text
//! Disconnected --logon--> Connected --Login--> LoggedIn --Consult/Conference--> InConference
//!      ^                      ^                 |    ^                              |
//!      |                      +-----Logout------+    +-----Cancel / HangUp----------+
//!      +--------------------------- close (from any phase) -------------------------+
//! ```
//!
//! `close` returns the connector to `Disconnected`: the connection, login
//! and conference flags are all cleared and the channel is dropped, so a
//! closed connector reports `is_logged_in() == false` and rejects commands
//! that emit events until the next `logon`.

use crate::channel::CallbackMethods;
use crate::chat::{ChatTransport, LoggingChatTransport};
use crate::command::ToolbarCommand;
use crate::config::ConnectorConfig;
use crate::dispatcher::{self, Dispatch};
use crate::emitter::EventEmitter;
use crate::error::ConnectorResult;
use crate::event::ToolbarEvent;
use crate::ids::CallIdGenerator;
use crate::session::{Session, SessionPhase};
use crate::simulation::Simulator;

/// Connector between the toolbar framework and the provider
pub struct ToolbarConnector {
    pub(crate) config: ConnectorConfig,
    pub(crate) session: Session,
    pub(crate) emitter: EventEmitter,
    pub(crate) ids: CallIdGenerator,
    chat: Box<dyn ChatTransport>,
    /// User name given to `logon`
    pub(crate) agent_user: Option<String>,
    /// Chat most recently delivered by the provider
    pub(crate) active_chat: Option<String>,
}

impl ToolbarConnector {
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            emitter: EventEmitter::new(config.missing_channel),
            config,
            session: Session::new(),
            ids: CallIdGenerator::new(),
            chat: Box::new(LoggingChatTransport),
            agent_user: None,
            active_chat: None,
        }
    }

    /// Replace the transport that receives the agent's chat messages
    pub fn with_chat_transport(mut self, transport: impl ChatTransport + 'static) -> Self {
        self.chat = Box::new(transport);
        self
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Establish the channel to the provider and register the toolbar's callbacks
    ///
    /// Not to be confused with the `Login` command, which signs the agent in.
    /// A login acknowledgment is delivered through `on_message` before this
    /// returns. The password is accepted for interface compatibility and is
    /// neither stored nor logged.
    pub fn logon(
        &mut self,
        server_url: &str,
        user_name: &str,
        _password: &str,
        callbacks: CallbackMethods,
    ) -> ConnectorResult<()> {
        tracing::info!("Logon to {} as {} ({:?})", server_url, user_name, callbacks);

        // A failed re-logon keeps the channel that was already working
        let previous = self.emitter.unregister();
        self.emitter.register(callbacks);
        if let Err(e) = self.emitter.acknowledge_login() {
            self.emitter.unregister();
            if let Some(previous) = previous {
                self.emitter.register(previous);
            }
            return Err(e);
        }

        self.session.connect();
        self.agent_user = Some(user_name.to_string());
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.session.connected
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.logged_in
    }

    pub fn in_conference(&self) -> bool {
        self.session.in_conference
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// Whether the toolbar must log on again after a browser refresh
    pub fn server_restarted(&self) -> bool {
        false
    }

    /// Terminate the agent's authentication with the provider
    ///
    /// Clears the login flag without emitting an event; the `Logout` command
    /// is the toolbar-visible way to sign out.
    pub fn logout(&mut self) {
        tracing::info!("Logout");
        self.session.logged_in = false;
    }

    /// Close the provider channel and return to `Disconnected`
    pub fn close(&mut self) {
        tracing::info!("Close from {}", self.session.phase());
        self.session.reset();
        self.emitter.unregister();
        self.active_chat = None;
    }

    /// Run one toolbar command
    ///
    /// Returns `Ok(true)` when the command was handled, `Ok(false)` when the
    /// operation is unknown or unsupported (nothing is emitted and the
    /// session is unchanged). Fails with
    /// [`NoActiveChannel`](crate::ConnectorError::NoActiveChannel) when the
    /// command would emit events before `logon`; the session is left
    /// untouched in that case too.
    pub fn send_toolbar_command(&mut self, command: &ToolbarCommand) -> ConnectorResult<bool> {
        let operation = command.operation.name();
        tracing::info!(
            "Toolbar command {} from {:?}@{:?}",
            operation,
            command.user_name,
            command.device_name
        );

        let transition = match dispatcher::dispatch(&self.session, command, &self.config, &mut self.ids)? {
            Dispatch::Handled(transition) => transition,
            Dispatch::Unsupported => {
                tracing::info!("Operation {} is not supported", operation);
                return Ok(false);
            }
            Dispatch::Unrecognized => {
                tracing::warn!("Unrecognized toolbar operation: {}", operation);
                return Ok(false);
            }
        };

        if !transition.events.is_empty() {
            self.emitter.ensure_channel(operation)?;
        }

        let previous = self.session.apply(transition.update);
        if previous.phase() != self.session.phase() {
            tracing::debug!("Session {} -> {} on {}", previous.phase(), self.session.phase(), operation);
        }

        if let Some(chat) = &transition.outbound_chat {
            if let Err(e) = self.chat.send(chat) {
                tracing::warn!("Chat transport rejected {:?}: {}", chat.send_type, e);
            }
        }

        let source_id = self.config.source_id.clone();
        for event in transition.events {
            self.emitter.emit(&self.config, event, &source_id)?;
        }
        Ok(true)
    }

    /// Decode and run a command given as the toolbar's JSON text
    pub fn send_toolbar_command_json(&mut self, raw: &str) -> ConnectorResult<bool> {
        let command = ToolbarCommand::from_json(raw)?;
        self.send_toolbar_command(&command)
    }

    /// Deliver an event directly, bypassing the dispatcher
    ///
    /// `source_id` defaults to the configured handshake source.
    pub fn send_toolbar_event(&mut self, event: ToolbarEvent, source_id: Option<&str>) -> ConnectorResult<()> {
        let source_id = source_id.unwrap_or(self.config.source_id.as_str()).to_string();
        self.emitter.emit(&self.config, event, &source_id)
    }

    /// Provider-initiated activity for this connector
    pub fn simulate(&mut self) -> Simulator<'_> {
        Simulator::new(self)
    }
}

impl std::fmt::Debug for ToolbarConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolbarConnector")
            .field("session", &self.session)
            .field("emitter", &self.emitter)
            .field("agent_user", &self.agent_user)
            .field("active_chat", &self.active_chat)
            .finish()
    }
}
