//! Domain types for fighters and participants

mod fighter;
mod participant;
mod roster;

pub use fighter::{FighterId, FighterRecord};
pub use participant::Participant;
pub use roster::{ROSTER_SIZE, Roster};
