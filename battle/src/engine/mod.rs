//! Turn-based battle engine
//!
//! The engine is transport agnostic. It talks to both seats through a
//! [`PlayerLink`] and draws attack kinds from an [`AttackRoll`].

mod battle;
mod link;
mod roll;
mod state;

pub use battle::{Battle, first_attacker};
pub use link::PlayerLink;
pub use roll::{AttackRoll, FixedRoll, RandomRoll};
pub use state::{AttackReport, BattleOutcome, BattleState, Outcome};
