//! Connector session state
//!
//! A [`Session`] holds the three flags the connector tracks between
//! commands. It is owned by a single [`ToolbarConnector`](crate::ToolbarConnector)
//! and only changes through [`SessionUpdate`]s produced by the dispatcher or
//! through the connector's lifecycle methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flags describing the agent's session with the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// A channel to the provider has been established by `logon`
    pub connected: bool,
    /// The agent is signed in to the provider (`Login` command)
    pub logged_in: bool,
    /// A consultation or conference call is merged into the active interaction
    pub in_conference: bool,
}

/// Lifecycle phase derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    Disconnected,
    Connected,
    LoggedIn,
    InConference,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Disconnected => write!(f, "Disconnected"),
            SessionPhase::Connected => write!(f, "Connected"),
            SessionPhase::LoggedIn => write!(f, "LoggedIn"),
            SessionPhase::InConference => write!(f, "InConference"),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        if !self.connected {
            SessionPhase::Disconnected
        } else if self.in_conference {
            SessionPhase::InConference
        } else if self.logged_in {
            SessionPhase::LoggedIn
        } else {
            SessionPhase::Connected
        }
    }

    /// Apply a dispatcher update, returning the previous session
    pub fn apply(&mut self, update: SessionUpdate) -> Session {
        let previous = *self;
        if let Some(logged_in) = update.logged_in {
            self.logged_in = logged_in;
        }
        if let Some(in_conference) = update.in_conference {
            self.in_conference = in_conference;
        }
        previous
    }

    /// Mark the provider channel as established
    pub fn connect(&mut self) {
        self.connected = true;
    }

    /// Return to [`SessionPhase::Disconnected`], clearing every flag
    pub fn reset(&mut self) {
        *self = Session::default();
    }
}

/// Flag changes requested by a handled command
///
/// `None` leaves the corresponding flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub logged_in: Option<bool>,
    pub in_conference: Option<bool>,
}

impl SessionUpdate {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn set_logged_in(logged_in: bool) -> Self {
        Self {
            logged_in: Some(logged_in),
            ..Default::default()
        }
    }

    pub fn set_in_conference(in_conference: bool) -> Self {
        Self {
            in_conference: Some(in_conference),
            ..Default::default()
        }
    }

    pub fn is_none(&self) -> bool {
        self.logged_in.is_none() && self.in_conference.is_none()
    }
}
