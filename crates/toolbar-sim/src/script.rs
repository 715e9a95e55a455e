//! Simulation script directives
//!
//! One directive per line; blank lines and lines starting with `#` are
//! skipped. Trailing free-text arguments (display names, chat text) take
//! the rest of the line.
//!
//! ```text
//! launch https://provider.example.com
//! logon https://provider.example.com alice secret
//! command {"Operation":"Login","UserName":"alice","DeviceName":"d1"}
//! inbound-call 15552224444 18885551234 John Smith
//! state
//! ```

use std::fmt;

use anyhow::{bail, Result};

/// A logon password; `Debug` never shows the value
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Launch { server_url: String },
    Logon { server_url: String, user_name: String, password: Password },
    Command { json: String },
    InboundCall { ani: String, dnis: String, display_string: String },
    OutboundCall { ani: String, dnis: String, display_string: String },
    InboundChat { email: String, display_string: String },
    Message { text: String },
    ConsultHangup { call_id: String },
    HangUp { call_id: String },
    Hold { call_id: String },
    Established { call_id: String },
    Logout,
    Close,
    State,
}

/// Parse one script line; `Ok(None)` for blank and comment lines
pub fn parse_line(line: &str) -> Result<Option<Directive>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };
    let mut args = Args::new(keyword, rest);

    let directive = match keyword {
        "launch" => Directive::Launch {
            server_url: args.word("server url")?,
        },
        "logon" => Directive::Logon {
            server_url: args.word("server url")?,
            user_name: args.word("user name")?,
            password: args.word("password")?.into(),
        },
        "command" => Directive::Command {
            json: args.text("command JSON")?,
        },
        "inbound-call" => Directive::InboundCall {
            ani: args.word("ani")?,
            dnis: args.word("dnis")?,
            display_string: args.text("display name")?,
        },
        "outbound-call" => Directive::OutboundCall {
            ani: args.word("ani")?,
            dnis: args.word("dnis")?,
            display_string: args.text("display name")?,
        },
        "inbound-chat" => Directive::InboundChat {
            email: args.word("email")?,
            display_string: args.text("display name")?,
        },
        "message" => Directive::Message {
            text: args.text("message text")?,
        },
        "consult-hangup" => Directive::ConsultHangup {
            call_id: args.word("call id")?,
        },
        "hangup" => Directive::HangUp {
            call_id: args.word("call id")?,
        },
        "hold" => Directive::Hold {
            call_id: args.word("call id")?,
        },
        "established" => Directive::Established {
            call_id: args.word("call id")?,
        },
        "logout" => Directive::Logout,
        "close" => Directive::Close,
        "state" => Directive::State,
        other => bail!("unknown directive '{}'", other),
    };

    args.finish()?;
    Ok(Some(directive))
}

/// Cursor over a directive's arguments
struct Args<'a> {
    keyword: &'a str,
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn new(keyword: &'a str, rest: &'a str) -> Self {
        Self { keyword, rest }
    }

    fn word(&mut self, what: &str) -> Result<String> {
        let (word, rest) = match self.rest.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (self.rest, ""),
        };
        if word.is_empty() {
            bail!("{}: missing {}", self.keyword, what);
        }
        self.rest = rest;
        Ok(word.to_string())
    }

    fn text(&mut self, what: &str) -> Result<String> {
        if self.rest.is_empty() {
            bail!("{}: missing {}", self.keyword, what);
        }
        let text = std::mem::take(&mut self.rest);
        Ok(text.to_string())
    }

    fn finish(self) -> Result<()> {
        if !self.rest.is_empty() {
            bail!("{}: unexpected arguments '{}'", self.keyword, self.rest);
        }
        Ok(())
    }
}
