use pokebat_protocol::Player;
use thiserror::Error;

use crate::types::FighterId;

/// A roster choice that cannot be honored
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Expected {expected} fighters, got {got}")]
    WrongCount { expected: usize, got: usize },

    #[error("Fighter {0} is not in the player's catalog roster")]
    UnknownFighter(FighterId),

    #[error("Fighter {0} was chosen more than once")]
    DuplicateFighter(FighterId),
}

/// A switch request that cannot be honored
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    #[error("No fighter in slot {0}")]
    NoSuchSlot(usize),

    #[error("{0} has fainted")]
    Fainted(String),
}

/// Failures that end a battle without a winner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("No reply from {0} before the deadline")]
    StalledPeer(Player),

    #[error("{0} left the battle")]
    Disconnected(Player),

    #[error("Failed to reach {player}: {message}")]
    Transport { player: Player, message: String },
}

impl BattleError {
    /// Seat responsible for the failure
    pub fn player(&self) -> Player {
        match self {
            Self::StalledPeer(player) | Self::Disconnected(player) => *player,
            Self::Transport { player, .. } => *player,
        }
    }
}
