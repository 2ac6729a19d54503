use thiserror::Error;

pub mod client;
pub mod server;

pub use client::input::{parse_confirm, parse_selection, parse_slot};
pub use client::{ClientCommand, parse_client_message};
pub use server::{LoginFailure, Player, ServerMessage, parse_server_message, prompt};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,

    #[error("Choice {value} is outside 1..={max}")]
    OutOfRange { value: usize, max: usize },
}
