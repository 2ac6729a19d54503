pub mod input;

use crate::ParseError;
use anyhow::Result;

const LOGIN_PREFIX: &str = "LOGIN:";
const LOGOUT_PREFIX: &str = "LOGOUT:";

/// Datagrams that clients send to the server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// LOGIN:NAME
    Login(String),

    /// LOGOUT:NAME
    Logout(String),

    /// Free text: roster choices, slot numbers, Y/N answers
    Text(String),
}

impl ClientCommand {
    /// Serialize command to wire format
    pub fn to_wire_format(&self) -> String {
        match self {
            Self::Login(name) => format!("{}{}", LOGIN_PREFIX, name),
            Self::Logout(name) => format!("{}{}", LOGOUT_PREFIX, name),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Classify a single inbound datagram
pub fn parse_client_message(datagram: &str) -> Result<ClientCommand> {
    let message = datagram.trim();

    if message.is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    if let Some(rest) = message.strip_prefix(LOGIN_PREFIX) {
        return Ok(ClientCommand::Login(parse_name(rest, "login name")?));
    }

    if let Some(rest) = message.strip_prefix(LOGOUT_PREFIX) {
        return Ok(ClientCommand::Logout(parse_name(rest, "logout name")?));
    }

    Ok(ClientCommand::Text(message.to_string()))
}

fn parse_name(rest: &str, field: &str) -> Result<String> {
    let name = rest.trim();
    if name.is_empty() {
        return Err(ParseError::MissingField(field.to_string()).into());
    }

    // NAME is the last field, a stray ':' inside it is not allowed
    if name.contains(':') {
        return Err(ParseError::InvalidFormat(format!("unexpected ':' in {}", field)).into());
    }

    Ok(name.to_string())
}
