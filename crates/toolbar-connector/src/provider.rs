//! Provider server launch surface
//!
//! Before the toolbar calls `logon`, it asks the connector factory to start
//! whatever local process talks to the provider and waits for it to report
//! that the server is up.

use crate::config::ConnectorConfig;
use crate::connector::ToolbarConnector;

/// Starts communication with the provider
pub trait ServerLauncher {
    /// Start the provider server; returns whether it is up
    ///
    /// `download_location` points at an installable client (for example a
    /// Java Web Start descriptor) when the provider needs one.
    fn launch_server(&mut self, download_location: Option<&str>, server_url: &str) -> bool;

    fn is_server_up(&self) -> bool;
}

/// Provider stand-in: launching always succeeds and connectors share one configuration
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    config: ConnectorConfig,
    server_up: bool,
}

impl SimulatedProvider {
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            config,
            server_up: false,
        }
    }

    /// A new connector instance for the toolbar
    pub fn connector(&self) -> ToolbarConnector {
        tracing::info!("Creating toolbar connector");
        ToolbarConnector::new(self.config.clone())
    }
}

impl ServerLauncher for SimulatedProvider {
    fn launch_server(&mut self, download_location: Option<&str>, server_url: &str) -> bool {
        tracing::info!("Launching provider server {} (download {:?})", server_url, download_location);
        self.server_up = true;
        self.server_up
    }

    fn is_server_up(&self) -> bool {
        self.server_up
    }
}
