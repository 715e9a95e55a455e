//! Drives a connector from script directives
//!
//! Every message the connector delivers to the toolbar callback is queued
//! and written out after the directive that produced it, followed by the
//! directive's own result line (`handled=true`, `call_id=...`).

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rvoip_toolbar_connector::{
    CallbackMethods, ChannelMessage, ConnectorConfig, EventOrigin, InteractionParams, ServerLauncher,
    SimulatedProvider, ToolbarConnector,
};

use crate::script::{self, Directive};

pub struct Runner<W: Write> {
    provider: SimulatedProvider,
    connector: ToolbarConnector,
    inbox: Arc<Mutex<Vec<ChannelMessage>>>,
    out: W,
    pretty: bool,
}

impl<W: Write> Runner<W> {
    pub fn new(config: ConnectorConfig, out: W, pretty: bool) -> Self {
        let provider = SimulatedProvider::new(config);
        let connector = provider.connector();
        Self {
            provider,
            connector,
            inbox: Arc::new(Mutex::new(Vec::new())),
            out,
            pretty,
        }
    }

    /// Execute every directive in `input`, stopping at the first failure
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("failed to read script")?;
            let line_no = index + 1;

            let Some(directive) = script::parse_line(&line).with_context(|| format!("line {}", line_no))? else {
                continue;
            };

            // Debug form, not the raw line: it redacts the logon password
            let summary = format!("{:?}", directive);
            tracing::debug!("line {}: {}", line_no, summary);
            self.execute(directive)
                .with_context(|| format!("line {}: {}", line_no, summary))?;
        }
        Ok(())
    }

    pub fn execute(&mut self, directive: Directive) -> Result<()> {
        let result = match directive {
            Directive::Launch { server_url } => {
                let up = self.provider.launch_server(None, &server_url);
                Some(format!("server_up={}", up))
            }
            Directive::Logon {
                server_url,
                user_name,
                password,
            } => {
                let callbacks = self.callbacks();
                self.connector.logon(&server_url, &user_name, password.expose(), callbacks)?;
                None
            }
            Directive::Command { json } => {
                let handled = self.connector.send_toolbar_command_json(&json)?;
                Some(format!("handled={}", handled))
            }
            Directive::InboundCall {
                ani,
                dnis,
                display_string,
            } => {
                let call_id = self.connector.simulate().inbound_call(&ani, &dnis, &display_string)?;
                Some(format!("call_id={}", call_id))
            }
            Directive::OutboundCall {
                ani,
                dnis,
                display_string,
            } => {
                let call_id = self.connector.simulate().outbound_call(&ani, &dnis, &display_string)?;
                Some(format!("call_id={}", call_id))
            }
            Directive::InboundChat { email, display_string } => {
                let chat_id = self.connector.simulate().inbound_chat(&email, &display_string)?;
                Some(format!("chat_id={}", chat_id))
            }
            Directive::Message { text } => {
                self.connector.simulate().inbound_message(&text)?;
                None
            }
            Directive::ConsultHangup { call_id } => {
                let emitted = self
                    .connector
                    .simulate()
                    .consultation_hangup(&call_id, &EventOrigin::default())?;
                Some(format!("off_conference={}", emitted))
            }
            Directive::HangUp { call_id } => {
                self.connector
                    .simulate()
                    .hang_up(&call_id, &InteractionParams::default())?;
                None
            }
            Directive::Hold { call_id } => {
                self.connector.simulate().hold(&call_id, &InteractionParams::default())?;
                None
            }
            Directive::Established { call_id } => {
                self.connector
                    .simulate()
                    .established(&call_id, &InteractionParams::default())?;
                None
            }
            Directive::Logout => {
                self.connector.logout();
                None
            }
            Directive::Close => {
                self.connector.close();
                None
            }
            Directive::State => Some(format!("state={}", self.connector.phase())),
        };

        self.flush_messages()?;
        if let Some(result) = result {
            writeln!(self.out, "{}", result)?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn connector(&self) -> &ToolbarConnector {
        &self.connector
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn callbacks(&self) -> CallbackMethods {
        let inbox = self.inbox.clone();
        CallbackMethods::on_message(move |_, message| inbox.lock().push(message.clone()))
    }

    fn flush_messages(&mut self) -> Result<()> {
        let messages: Vec<ChannelMessage> = self.inbox.lock().drain(..).collect();
        for message in &messages {
            let json = if self.pretty {
                serde_json::to_string_pretty(message)?
            } else {
                serde_json::to_string(message)?
            };
            writeln!(self.out, "{}", json)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rvoip_toolbar_connector::SessionPhase;
    use tracing_test::traced_test;

    fn run(script: &str) -> (Vec<String>, SessionPhase) {
        let mut runner = Runner::new(ConnectorConfig::default(), Vec::new(), false);
        runner.run(script.as_bytes()).unwrap();
        let phase = runner.connector().phase();
        let output = String::from_utf8(runner.into_output()).unwrap();
        (output.lines().map(str::to_owned).collect(), phase)
    }

    fn event_name(line: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        value["data"]["EventName"].as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn login_script() {
        let (lines, phase) = run(
            "# agent signs in\n\
             launch https://provider.example.com\n\
             logon https://provider.example.com alice secret\n\
             command {\"Operation\":\"Login\",\"UserName\":\"alice\",\"DeviceName\":\"d1\"}\n\
             state\n",
        );

        assert_eq!(lines[0], "server_up=true");
        assert!(lines[1].contains("\"msg\":\"ok\""), "{}", lines[1]);
        assert_eq!(event_name(&lines[2]), "AgentLoggedOn");
        assert_eq!(event_name(&lines[3]), "AgentReady");
        assert_eq!(lines[4], "handled=true");
        assert_eq!(lines[5], "state=LoggedIn");
        assert_eq!(lines.len(), 6);
        assert_eq!(phase, SessionPhase::LoggedIn);
    }

    #[test]
    fn call_and_chat_script() {
        let (lines, _) = run(
            "logon https://p alice pw\n\
             inbound-call 15552224444 18885551234 John Smith\n\
             inbound-chat john@example.com John Smith\n\
             message Hello there\n",
        );

        let names: Vec<String> = lines.iter().filter(|l| l.starts_with('{')).map(|l| event_name(l)).collect();
        assert_eq!(
            names,
            vec![
                "", // login acknowledgment
                "AgentBusy",
                "Delivered",
                "Established",
                "AgentBusy",
                "Delivered",
                "Established",
                "UserTyping",
                "UserTypingStopped",
                "NewMessage"
            ]
        );
        assert!(lines.iter().any(|l| l.starts_with("call_id=")));
        assert!(lines.iter().any(|l| l.starts_with("chat_id=")));
    }

    #[test]
    fn unknown_operation_reports_unhandled() {
        let (lines, _) = run("logon https://p alice pw\ncommand {\"Operation\":\"Teleport\"}\n");
        assert_eq!(lines.last().map(String::as_str), Some("handled=false"));
    }

    #[test]
    fn close_then_state() {
        let (lines, phase) = run("logon https://p alice pw\nclose\nstate\n");
        assert_eq!(lines.last().map(String::as_str), Some("state=Disconnected"));
        assert_eq!(phase, SessionPhase::Disconnected);
    }

    #[test]
    #[traced_test]
    fn logon_password_stays_out_of_logs() {
        let (lines, _) = run("logon https://p alice s3cr3t-pw\nstate\n");

        assert_eq!(lines.last().map(String::as_str), Some("state=Connected"));
        assert!(logs_contain("alice"));
        assert!(!logs_contain("s3cr3t-pw"));
    }

    #[test]
    fn failures_name_the_line() {
        let mut runner = Runner::new(ConnectorConfig::default(), Vec::new(), false);
        let err = runner
            .run("# nothing registered yet\ninbound-call 1 2 A\n".as_bytes())
            .unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(rendered.contains("line 2"), "{}", rendered);
        assert!(rendered.contains("InboundCall {"), "{}", rendered);
    }
}
