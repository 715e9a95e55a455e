mod common;

use common::{command, connected};
use pretty_assertions::assert_eq;

use rvoip_toolbar_connector::{
    CallParams, ConnectorConfig, ConnectorError, DeliveredParams, Direction, EventName, EventOrigin,
    InteractionParams, InteractionType, MediaType, Operation, SendType, ToolbarConnector,
};

#[test]
fn inbound_call_sequence() {
    let (mut connector, recorder) = connected();

    let call_id = connector
        .simulate()
        .inbound_call("15552224444", "18885551234", "John Smith")
        .unwrap();

    assert_eq!(
        recorder.names(),
        vec![EventName::AgentBusy, EventName::Delivered, EventName::Established]
    );

    let events = recorder.events();
    let delivered = &events[1];
    assert_eq!(delivered.media_item_id.as_deref(), Some(call_id.as_str()));
    assert_eq!(delivered.ani.as_deref(), Some("15552224444"));
    assert_eq!(delivered.dnis.as_deref(), Some("18885551234"));
    assert_eq!(delivered.direction, Some(Direction::Inbound));
    assert_eq!(delivered.interaction_type, Some(InteractionType::InboundCall));
    assert_eq!(events[2].media_item_id.as_deref(), Some(call_id.as_str()));

    // logon user with the configured simulated device
    assert_eq!(delivered.user_name.as_deref(), Some("alice"));
    assert_eq!(delivered.device_name.as_deref(), Some("myDevice"));
}

#[test]
fn outbound_call_from_external_device() {
    let (mut connector, recorder) = connected();

    connector
        .simulate()
        .outbound_call("18885551234", "15552224444", "Acme")
        .unwrap();

    let delivered = &recorder.events()[1];
    assert_eq!(delivered.direction, Some(Direction::Outbound));
    assert_eq!(delivered.interaction_type, Some(InteractionType::OutboundCall));
}

#[test]
fn simulated_calls_and_commands_share_id_sequence() {
    let (mut connector, recorder) = connected();

    let first = connector.simulate().inbound_call("1", "2", "A").unwrap();
    let second = connector.simulate().inbound_call("1", "2", "A").unwrap();
    assert_ne!(first, second);

    recorder.clear();
    connector
        .send_toolbar_command(&command(Operation::HangUp(CallParams::for_media_item(first.clone()))))
        .unwrap();
    assert_eq!(recorder.events()[0].media_item_id.as_deref(), Some(first.as_str()));
}

#[test]
fn chat_then_message() {
    let (mut connector, recorder) = connected();

    let chat_id = connector
        .simulate()
        .inbound_chat("john@example.com", "John Smith")
        .unwrap();

    let delivered = &recorder.events()[1];
    assert_eq!(delivered.email.as_deref(), Some("john@example.com"));
    assert_eq!(delivered.media_type, Some(MediaType::Chat));
    assert_eq!(delivered.interaction_type, Some(InteractionType::InboundChat));
    recorder.clear();

    connector.simulate().inbound_message("Hello there").unwrap();

    assert_eq!(
        recorder.names(),
        vec![EventName::UserTyping, EventName::UserTypingStopped, EventName::NewMessage]
    );
    let events = recorder.events();
    for event in &events {
        assert_eq!(event.media_item_id.as_deref(), Some(chat_id.as_str()));
    }
    assert_eq!(events[2].send_type, Some(SendType::Chat));
    assert_eq!(events[2].send_string.as_deref(), Some("Hello there"));
}

#[test]
fn message_without_chat_is_rejected() {
    let (mut connector, recorder) = connected();

    let result = connector.simulate().inbound_message("Hello");

    assert!(matches!(result, Err(ConnectorError::NoActiveChat)));
    assert_eq!(recorder.len(), 0);
}

#[test]
fn close_forgets_the_active_chat() {
    let (mut connector, _recorder) = connected();
    connector.simulate().inbound_chat("a@example.com", "A").unwrap();

    connector.close();

    assert!(matches!(
        connector.simulate().inbound_message("late"),
        Err(ConnectorError::NoActiveChat)
    ));
}

#[test]
fn consultation_hangup_only_inside_conference() {
    let (mut connector, recorder) = connected();

    assert!(!connector
        .simulate()
        .consultation_hangup("1001", &EventOrigin::default())
        .unwrap());
    assert_eq!(recorder.len(), 0);

    connector
        .send_toolbar_command(&command(Operation::Conference(CallParams::for_media_item("1001"))))
        .unwrap();
    recorder.clear();

    let origin = EventOrigin {
        source_id: Some("queue-9".to_string()),
        user_name: Some("supervisor".to_string()),
        device_name: None,
    };
    assert!(connector.simulate().consultation_hangup("1001", &origin).unwrap());
    assert!(!connector.in_conference());

    let messages = recorder.messages();
    let envelope = messages[0].envelope().unwrap();
    assert_eq!(envelope.source_id, "queue-9");
    assert_eq!(envelope.data.name, EventName::OffConference);
    assert_eq!(envelope.data.user_name.as_deref(), Some("supervisor"));
}

#[test]
fn single_provider_events_use_defaults_and_overrides() {
    let (mut connector, recorder) = connected();

    connector
        .simulate()
        .established("1001", &InteractionParams::default())
        .unwrap();
    connector
        .simulate()
        .consult("1001", &InteractionParams::default())
        .unwrap();
    connector
        .simulate()
        .hold(
            "c1",
            &InteractionParams {
                interaction_type: Some(InteractionType::InboundChat),
                media_type: Some(MediaType::Chat),
                origin: EventOrigin {
                    device_name: Some("desk-3".to_string()),
                    ..EventOrigin::default()
                },
            },
        )
        .unwrap();
    connector.simulate().hang_up("1001", &InteractionParams::default()).unwrap();

    assert_eq!(
        recorder.names(),
        vec![
            EventName::Established,
            EventName::OnConsultation,
            EventName::OnHold,
            EventName::Released
        ]
    );

    let events = recorder.events();
    assert_eq!(events[0].interaction_type, Some(InteractionType::InboundCall));
    assert_eq!(events[1].interaction_type, Some(InteractionType::ConsultationCall));
    assert_eq!(events[2].media_type, Some(MediaType::Chat));
    assert_eq!(events[2].device_name.as_deref(), Some("desk-3"));
    assert_eq!(events[3].media_type, Some(MediaType::Phone));
}

#[test]
fn delivered_with_custom_attributes() {
    let (mut connector, recorder) = connected();

    let params = DeliveredParams {
        direction: Some(Direction::Outbound),
        interaction_type: Some(InteractionType::WebCallback),
        display_string: Some("Callback".to_string()),
        phone_number: Some("15550001111".to_string()),
        ..DeliveredParams::new("2001")
    };
    connector.simulate().delivered(&params).unwrap();

    let event = &recorder.events()[0];
    assert_eq!(event.name, EventName::Delivered);
    assert_eq!(event.media_item_id.as_deref(), Some("2001"));
    assert_eq!(event.interaction_type, Some(InteractionType::WebCallback));
    assert_eq!(event.direction, Some(Direction::Outbound));
    assert_eq!(event.phone_number.as_deref(), Some("15550001111"));
}

#[test]
fn simulation_before_logon_fails() {
    let mut connector = ToolbarConnector::new(ConnectorConfig::default());

    let result = connector.simulate().inbound_call("1", "2", "A");
    assert!(matches!(result, Err(ConnectorError::NoActiveChannel { .. })));
}
