mod battle;
pub mod prompt;

pub use battle::Player;

const SUCCESS_PREFIX: &str = "SUCCESS: You have registered as ";
const NO_PLAYER_PREFIX: &str = "FAILED: no player found ";
const ALREADY_LOGGED_IN_PREFIX: &str = "FAILED: already logged in ";

/// Why a login was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    /// Name is not in the catalog
    NoPlayer,
    /// Name is already waiting or battling
    AlreadyLoggedIn,
}

/// Datagrams the server sends to clients
///
/// Only the login replies carry a stable format; everything else is
/// narration or prompt text meant for humans.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    LoginSuccess(String),
    LoginFailed { name: String, reason: LoginFailure },
    Text(String),
}

impl ServerMessage {
    /// Serialize to wire format
    pub fn to_wire_format(&self) -> String {
        match self {
            Self::LoginSuccess(name) => format!("{}{}", SUCCESS_PREFIX, name),
            Self::LoginFailed {
                name,
                reason: LoginFailure::NoPlayer,
            } => format!("{}{}", NO_PLAYER_PREFIX, name),
            Self::LoginFailed {
                name,
                reason: LoginFailure::AlreadyLoggedIn,
            } => format!("{}{}", ALREADY_LOGGED_IN_PREFIX, name),
            Self::Text(text) => text.clone(),
        }
    }

    /// Whether this is a successful login reply
    pub fn is_success(&self) -> bool {
        matches!(self, Self::LoginSuccess(_))
    }
}

/// Parse a datagram received from the server
pub fn parse_server_message(datagram: &str) -> ServerMessage {
    if let Some(name) = datagram.strip_prefix(SUCCESS_PREFIX) {
        return ServerMessage::LoginSuccess(name.trim().to_string());
    }

    if let Some(name) = datagram.strip_prefix(NO_PLAYER_PREFIX) {
        return ServerMessage::LoginFailed {
            name: name.trim().to_string(),
            reason: LoginFailure::NoPlayer,
        };
    }

    if let Some(name) = datagram.strip_prefix(ALREADY_LOGGED_IN_PREFIX) {
        return ServerMessage::LoginFailed {
            name: name.trim().to_string(),
            reason: LoginFailure::AlreadyLoggedIn,
        };
    }

    ServerMessage::Text(datagram.to_string())
}
