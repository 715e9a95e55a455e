//! Shared helpers for connector integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;

use rvoip_toolbar_connector::{
    CallbackMethods, ChannelMessage, ConnectorConfig, EventName, Operation, ToolbarCommand, ToolbarConnector,
    ToolbarEvent,
};

/// Records every message delivered through `on_message`
#[derive(Clone, Default)]
pub struct Recorder {
    messages: Arc<Mutex<Vec<ChannelMessage>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callbacks(&self) -> CallbackMethods {
        let sink = self.messages.clone();
        CallbackMethods::on_message(move |_, message| sink.lock().push(message.clone()))
    }

    pub fn messages(&self) -> Vec<ChannelMessage> {
        self.messages.lock().clone()
    }

    pub fn events(&self) -> Vec<ToolbarEvent> {
        self.messages
            .lock()
            .iter()
            .filter_map(|message| message.event().cloned())
            .collect()
    }

    pub fn names(&self) -> Vec<EventName> {
        self.events().into_iter().map(|event| event.name).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

/// A connector that has completed `logon`, with the acknowledgment already cleared
pub fn connected_with(config: ConnectorConfig) -> (ToolbarConnector, Recorder) {
    let recorder = Recorder::new();
    let mut connector = ToolbarConnector::new(config);
    connector
        .logon("https://provider.example.com", "alice", "pw", recorder.callbacks())
        .expect("logon");
    recorder.clear();
    (connector, recorder)
}

pub fn connected() -> (ToolbarConnector, Recorder) {
    connected_with(ConnectorConfig::default())
}

/// `operation` issued by alice on device d1
pub fn command(operation: Operation) -> ToolbarCommand {
    ToolbarCommand::new(operation).with_agent("alice", "d1")
}
