use std::net::SocketAddr;

use pokebat_battle::SelectionError;
use thiserror::Error;

/// Failures of registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("No player named {0} in the catalog")]
    UnknownPlayer(String),

    #[error("{0} is already logged in")]
    AlreadyLoggedIn(String),

    #[error("{0} is not waiting for a match")]
    NotRegistered(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
}

/// Failures reading from or writing to the socket
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Datagram from {from} exceeds {max} bytes")]
    Oversized { from: SocketAddr, max: usize },

    #[error("Datagram from {from} is not valid UTF-8")]
    NotUtf8 { from: SocketAddr },
}
