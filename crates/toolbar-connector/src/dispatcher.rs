//! Command dispatcher
//!
//! Translates one [`ToolbarCommand`] into a [`Transition`]: the session
//! flags to change and the events to emit, in emission order. The
//! dispatcher does not touch the session or the channel itself; the
//! connector applies the transition only after checking that its events
//! can be delivered.
//!
//! | Operation | Session change | Events |
//! |---|---|---|
//! | Login | logged in | AgentLoggedOn, AgentReady |
//! | Logout | logged out | AgentLoggedOut |
//! | MakeReady | | AgentReady |
//! | MakeNotReady | | AgentNotReady |
//! | GetConnectorCapability | | AgentConnectorCapability |
//! | GetBreakReasons | | BreakReasons |
//! | MakeCall | | AgentBusy, Delivered, Established |
//! | HangUp | conference cleared | Released, OffConference (in conference only) |
//! | OnHold | | OnHold |
//! | OffHold, Accept | | Established |
//! | Ignore, End | | End, AgentReady |
//! | SingleStepTransfer, CompleteTransfer | | Released |
//! | Consult | in conference | OnConsultation |
//! | Conference | in conference | OnConference |
//! | Cancel | conference cleared | OffConference |
//! | UpdateData, Send | | |
//! | SetFocalInteraction | | FocusInteraction |
//! | RequestTranscript | | Transcript |
//!
//! `ResendLastEvent` is [`Dispatch::Unsupported`]; any other name is
//! [`Dispatch::Unrecognized`].

use crate::command::{
    CallParams, MakeCallParams, Operation, SendParams, ToolbarCommand, TranscriptParams, TransferParams,
};
use crate::config::ConnectorConfig;
use crate::error::ConnectorResult;
use crate::event::{AgentIdentity, EventName, ToolbarEvent};
use crate::ids::CallIdGenerator;
use crate::session::{Session, SessionUpdate};
use crate::types::{Direction, InteractionType, MediaType, SendType};

/// Outcome of dispatching one command
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The command is handled; apply the transition
    Handled(Transition),
    /// A known operation this connector does not implement
    Unsupported,
    /// An operation name outside the toolbar vocabulary
    Unrecognized,
}

/// Session changes and events produced by a handled command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub update: SessionUpdate,
    /// Events in emission order
    pub events: Vec<ToolbarEvent>,
    /// Chat payload to forward to the provider's chat transport
    pub outbound_chat: Option<OutboundChat>,
}

impl Transition {
    pub fn new(update: SessionUpdate) -> Self {
        Self {
            update,
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event: ToolbarEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = ToolbarEvent>) -> Self {
        self.events.extend(events);
        self
    }
}

/// A chat message or status change the agent sent from the toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundChat {
    pub chat_id: Option<String>,
    pub send_type: SendType,
    pub payload: Option<String>,
}

/// Map `command` onto a transition given the current `session`
///
/// New interaction ids are drawn from `ids`; nothing else is mutated.
pub fn dispatch(
    session: &Session,
    command: &ToolbarCommand,
    config: &ConnectorConfig,
    ids: &mut CallIdGenerator,
) -> ConnectorResult<Dispatch> {
    let agent = command.agent();

    let transition = match &command.operation {
        Operation::Login(login) => {
            tracing::debug!(
                "Login for {:?} (group {:?}, extension {:?})",
                agent.user_name,
                login.company,
                login.agent_extension
            );
            Transition::new(SessionUpdate::set_logged_in(true))
                .with_event(
                    ToolbarEvent::new(EventName::AgentLoggedOn, &agent).with_native_chat(config.use_native_chat),
                )
                .with_event(ToolbarEvent::new(EventName::AgentReady, &agent))
        }

        Operation::Logout => Transition::new(SessionUpdate::set_logged_in(false))
            .with_event(ToolbarEvent::new(EventName::AgentLoggedOut, &agent)),

        Operation::MakeReady => {
            Transition::new(SessionUpdate::none()).with_event(ToolbarEvent::new(EventName::AgentReady, &agent))
        }

        Operation::MakeNotReady(not_ready) => Transition::new(SessionUpdate::none()).with_event(
            ToolbarEvent::new(EventName::AgentNotReady, &agent)
                .with_break_reason_code(not_ready.break_reason_code.as_deref()),
        ),

        Operation::GetConnectorCapability => Transition::new(SessionUpdate::none()).with_event(
            ToolbarEvent::new(EventName::AgentConnectorCapability, &agent)
                .with_connector_capability(config.capability_string()?),
        ),

        Operation::GetBreakReasons => {
            // The toolbar's BreakReasons event carries no device
            let agent = AgentIdentity {
                device_name: None,
                ..agent
            };
            Transition::new(SessionUpdate::none()).with_event(
                ToolbarEvent::new(EventName::BreakReasons, &agent).with_break_reasons(&config.break_reasons),
            )
        }

        Operation::MakeCall(call) => make_call(&agent, call, config, ids),

        Operation::HangUp(call) => hang_up(session, &agent, call),

        Operation::OnHold(call) => Transition::new(SessionUpdate::none())
            .with_event(phone_event(EventName::OnHold, &agent, call, InteractionType::InboundCall)),

        Operation::OffHold(call) | Operation::Accept(call) => Transition::new(SessionUpdate::none())
            .with_event(phone_event(EventName::Established, &agent, call, InteractionType::InboundCall)),

        Operation::Ignore(call) => end_interaction(&agent, call, InteractionType::InboundCall),

        Operation::End(call) => end_interaction(&agent, call, InteractionType::OutboundCall),

        Operation::SingleStepTransfer(transfer) => {
            log_transfer("SingleStepTransfer", transfer);
            Transition::new(SessionUpdate::none()).with_event(phone_event(
                EventName::Released,
                &agent,
                &transfer.call,
                InteractionType::ConsultationCall,
            ))
        }

        Operation::Consult(transfer) => {
            log_transfer("Consult", transfer);
            Transition::new(SessionUpdate::set_in_conference(true)).with_event(
                phone_event(
                    EventName::OnConsultation,
                    &agent,
                    &transfer.call,
                    InteractionType::ConsultationCall,
                )
                .with_slot(None),
            )
        }

        Operation::Conference(call) => Transition::new(SessionUpdate::set_in_conference(true)).with_event(
            phone_event(EventName::OnConference, &agent, call, InteractionType::ConsultationCall).with_slot(None),
        ),

        Operation::CompleteTransfer(transfer) => {
            log_transfer("CompleteTransfer", transfer);
            Transition::new(SessionUpdate::none()).with_event(
                phone_event(
                    EventName::Released,
                    &agent,
                    &transfer.call,
                    InteractionType::ConsultationCall,
                )
                .with_slot(None),
            )
        }

        Operation::Cancel(call) => Transition::new(SessionUpdate::set_in_conference(false)).with_event(
            ToolbarEvent::new(EventName::OffConference, &agent)
                .with_optional_media_item(call.media_item_id.as_deref()),
        ),

        Operation::UpdateData(update) => {
            tracing::debug!("UpdateData is reserved; ignoring contact name {:?}", update.contact_name);
            Transition::new(SessionUpdate::none())
        }

        Operation::ResendLastEvent => return Ok(Dispatch::Unsupported),

        Operation::SetFocalInteraction(call) => {
            let mut event = ToolbarEvent::new(EventName::FocusInteraction, &agent)
                .with_optional_media_item(call.media_item_id.as_deref());
            event.interaction_type = call.interaction_type;
            event.media_type = Some(MediaType::Phone);
            Transition::new(SessionUpdate::none()).with_event(event)
        }

        Operation::Send(send) => send_chat(send),

        Operation::RequestTranscript(request) => transcript(&agent, request, config),

        Operation::Unrecognized(_) => return Ok(Dispatch::Unrecognized),
    };

    Ok(Dispatch::Handled(transition))
}

/// Interaction event for an existing phone call
fn phone_event(
    name: EventName,
    agent: &AgentIdentity,
    call: &CallParams,
    default_type: InteractionType,
) -> ToolbarEvent {
    ToolbarEvent::new(name, agent)
        .with_slot(call.slot)
        .with_optional_media_item(call.media_item_id.as_deref())
        .with_interaction(call.interaction_type.unwrap_or(default_type), MediaType::Phone)
}

fn make_call(
    agent: &AgentIdentity,
    call: &MakeCallParams,
    config: &ConnectorConfig,
    ids: &mut CallIdGenerator,
) -> Transition {
    let call_id = ids.next_id();
    tracing::info!(
        "Placing outbound call {} to {:?} (temporary id {:?})",
        call_id,
        call.phone_number,
        call.temp_call_id
    );

    let phone_number = call.phone_number.as_deref();
    let delivered = ToolbarEvent::new(EventName::Delivered, agent)
        .with_slot(call.slot)
        .with_temp_call_id(call.temp_call_id.as_deref())
        .with_media_item(call_id.clone())
        .with_party(
            phone_number,
            Some(config.outbound_dnis.as_str()),
            call.display_string.as_deref(),
            phone_number,
        )
        .with_interaction(InteractionType::OutboundCall, MediaType::Phone)
        .with_direction(Direction::Outbound);

    let established = ToolbarEvent::new(EventName::Established, agent)
        .with_slot(call.slot)
        .with_media_item(call_id)
        .with_interaction(InteractionType::OutboundCall, MediaType::Phone);

    Transition::new(SessionUpdate::none())
        .with_event(ToolbarEvent::new(EventName::AgentBusy, agent))
        .with_event(delivered)
        .with_event(established)
}

fn hang_up(session: &Session, agent: &AgentIdentity, call: &CallParams) -> Transition {
    let released = phone_event(EventName::Released, agent, call, InteractionType::InboundCall);

    if !session.in_conference {
        return Transition::new(SessionUpdate::none()).with_event(released);
    }

    let off_conference = ToolbarEvent::new(EventName::OffConference, agent)
        .with_slot(call.slot)
        .with_optional_media_item(call.media_item_id.as_deref());

    Transition::new(SessionUpdate::set_in_conference(false)).with_events([released, off_conference])
}

fn end_interaction(agent: &AgentIdentity, call: &CallParams, default_type: InteractionType) -> Transition {
    Transition::new(SessionUpdate::none())
        .with_event(phone_event(EventName::End, agent, call, default_type))
        .with_event(ToolbarEvent::new(EventName::AgentReady, agent))
}

fn send_chat(send: &SendParams) -> Transition {
    let Some(send_type) = send.send_type else {
        tracing::warn!("Send without SendType for chat {:?}; nothing to forward", send.media_item_id);
        return Transition::new(SessionUpdate::none());
    };

    let mut transition = Transition::new(SessionUpdate::none());
    transition.outbound_chat = Some(OutboundChat {
        chat_id: send.media_item_id.clone(),
        send_type,
        payload: send.send_string.clone(),
    });
    transition
}

fn transcript(agent: &AgentIdentity, request: &TranscriptParams, config: &ConnectorConfig) -> Transition {
    let event = ToolbarEvent::new(EventName::Transcript, agent)
        .with_transcript(config.transcript.content_type, config.transcript.text.clone())
        .with_optional_media_item(request.media_item_id.as_deref())
        .with_interaction(
            request.interaction_type.unwrap_or(InteractionType::InboundChat),
            MediaType::Chat,
        );
    Transition::new(SessionUpdate::none()).with_event(event)
}

fn log_transfer(operation: &str, transfer: &TransferParams) {
    tracing::debug!(
        "{} of {:?} to agent {:?} (user {:?}, extension {:?}), contact {:?}, organization {:?}",
        operation,
        transfer.call.media_item_id,
        transfer.target_agent,
        transfer.target_user_id,
        transfer.target_extension,
        transfer.contact_id,
        transfer.organization_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{LoginParams, NotReadyParams};
    use crate::types::MessageType;
    use pretty_assertions::assert_eq;

    fn run(session: &Session, operation: Operation) -> Dispatch {
        let command = ToolbarCommand::new(operation).with_agent("alice", "d1");
        dispatch(session, &command, &ConnectorConfig::default(), &mut CallIdGenerator::new()).unwrap()
    }

    fn handled(dispatch: Dispatch) -> Transition {
        match dispatch {
            Dispatch::Handled(transition) => transition,
            other => panic!("expected a handled command, got {:?}", other),
        }
    }

    fn names(transition: &Transition) -> Vec<EventName> {
        transition.events.iter().map(|event| event.name).collect()
    }

    #[test]
    fn login_sets_flag_and_reports_logon_then_ready() {
        let transition = handled(run(&Session::new(), Operation::Login(LoginParams::default())));

        assert_eq!(transition.update, SessionUpdate::set_logged_in(true));
        assert_eq!(names(&transition), vec![EventName::AgentLoggedOn, EventName::AgentReady]);
        assert_eq!(transition.events[0].use_native_chat, Some(true));
        assert!(transition.events.iter().all(|e| e.message_type == MessageType::AgentEvent));
    }

    #[test]
    fn not_ready_carries_break_reason() {
        let transition = handled(run(
            &Session::new(),
            Operation::MakeNotReady(NotReadyParams {
                break_reason_code: Some("6003".to_string()),
            }),
        ));
        assert_eq!(transition.events[0].break_reason_code.as_deref(), Some("6003"));
    }

    #[test]
    fn hang_up_depends_on_conference_flag() {
        let call = CallParams::for_media_item("1001");

        let plain = handled(run(&Session::new(), Operation::HangUp(call.clone())));
        assert_eq!(names(&plain), vec![EventName::Released]);
        assert!(plain.update.is_none());

        let conferenced = Session {
            connected: true,
            logged_in: true,
            in_conference: true,
        };
        let teardown = handled(run(&conferenced, Operation::HangUp(call)));
        assert_eq!(names(&teardown), vec![EventName::Released, EventName::OffConference]);
        assert_eq!(teardown.update, SessionUpdate::set_in_conference(false));
        assert_eq!(teardown.events[1].media_item_id.as_deref(), Some("1001"));
    }

    #[test]
    fn interaction_type_defaults_and_overrides() {
        let on_hold = handled(run(&Session::new(), Operation::OnHold(CallParams::for_media_item("1"))));
        assert_eq!(on_hold.events[0].interaction_type, Some(InteractionType::InboundCall));

        let end = handled(run(&Session::new(), Operation::End(CallParams::for_media_item("1"))));
        assert_eq!(end.events[0].interaction_type, Some(InteractionType::OutboundCall));

        let overridden = CallParams {
            interaction_type: Some(InteractionType::WebCallback),
            ..CallParams::for_media_item("1")
        };
        let accept = handled(run(&Session::new(), Operation::Accept(overridden)));
        assert_eq!(accept.events[0].interaction_type, Some(InteractionType::WebCallback));
    }

    #[test]
    fn resend_and_unknown_are_not_handled() {
        assert_eq!(run(&Session::new(), Operation::ResendLastEvent), Dispatch::Unsupported);
        assert_eq!(
            run(&Session::new(), Operation::Unrecognized("Teleport".to_string())),
            Dispatch::Unrecognized
        );
    }

    #[test]
    fn send_forwards_chat_without_events() {
        let transition = handled(run(
            &Session::new(),
            Operation::Send(SendParams {
                media_item_id: Some("c1".to_string()),
                send_type: Some(SendType::Chat),
                send_string: Some("hello".to_string()),
            }),
        ));

        assert!(transition.events.is_empty());
        assert_eq!(
            transition.outbound_chat,
            Some(OutboundChat {
                chat_id: Some("c1".to_string()),
                send_type: SendType::Chat,
                payload: Some("hello".to_string()),
            })
        );
    }

    #[test]
    fn break_reasons_event_has_no_device() {
        let transition = handled(run(&Session::new(), Operation::GetBreakReasons));
        let event = &transition.events[0];
        assert_eq!(event.device_name, None);
        assert_eq!(event.user_name.as_deref(), Some("alice"));
        assert_eq!(event.break_reasons.len(), 5);
    }
}
